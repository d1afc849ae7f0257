//! The `KeyValueStore` trait and an in-memory implementation.
//!
//! The history store persists everything through this trait. Backends live in
//! their own crates (e.g. `deficit-store-sqlite`); [`MemoryStore`] is for tests
//! and sessions that should not outlive the process.

use std::{collections::HashMap, convert::Infallible};

/// A flat, synchronous string → string store.
///
/// Values are opaque text; the history store writes JSON into them.
pub trait KeyValueStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value under `key`. Returns `None` if nothing is stored.
  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Write `value` under `key`, replacing any previous value.
  fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// A [`KeyValueStore`] backed by a `HashMap`. Never fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
    self.entries.insert(key.to_owned(), value.to_owned());
    Ok(())
  }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
  type Error = S::Error;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    (**self).get(key)
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
    (**self).set(key, value)
  }
}

//! The key-value backend the binary runs on.
//!
//! Normally a [`SqliteStore`]; if that cannot be opened the session falls
//! back to memory so scoring keeps working without persistence.

use std::path::Path;

use deficit_core::store::{KeyValueStore, MemoryStore};
use deficit_store_sqlite::SqliteStore;

#[derive(Debug)]
pub enum Backend {
  Sqlite(SqliteStore),
  Memory(MemoryStore),
}

impl Backend {
  /// Open the SQLite store at `path`, or fall back to memory.
  ///
  /// The second value carries the reason when the fallback was taken.
  pub fn open_or_memory(path: &Path) -> (Self, Option<String>) {
    match SqliteStore::open(path) {
      Ok(store) => (Self::Sqlite(store), None),
      Err(e) => {
        tracing::warn!(
          path = %path.display(),
          error = %e,
          "store unavailable, falling back to memory"
        );
        (
          Self::Memory(MemoryStore::new()),
          Some(format!("Store unavailable ({e}); nothing will be saved")),
        )
      }
    }
  }
}

impl KeyValueStore for Backend {
  type Error = deficit_store_sqlite::Error;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    match self {
      Self::Sqlite(store) => store.get(key),
      Self::Memory(store) => store.get(key).map_err(|never| match never {}),
    }
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
    match self {
      Self::Sqlite(store) => store.set(key, value),
      Self::Memory(store) => store.set(key, value).map_err(|never| match never {}),
    }
  }
}

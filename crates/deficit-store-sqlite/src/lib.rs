//! SQLite backend for the deficit key-value store.
//!
//! One table, one row per key. Reads and writes are synchronous; every call
//! completes before returning.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

//! [`SqliteStore`]: the SQLite implementation of [`KeyValueStore`].

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use deficit_core::store::KeyValueStore;
use rusqlite::{Connection, OptionalExtension as _};

use crate::{
  Error, Result,
  schema::{SCHEMA, SCHEMA_VERSION},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A deficit key-value store backed by a single SQLite file.
#[derive(Debug)]
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Missing parent directories are created.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Self::init(conn)
  }

  /// Open an in-memory store, for tests.
  pub fn open_in_memory() -> Result<Self> {
    Self::init(Connection::open_in_memory()?)
  }

  fn init(conn: Connection) -> Result<Self> {
    let found: i64 =
      conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if found > SCHEMA_VERSION {
      return Err(Error::SchemaVersion {
        found,
        supported: SCHEMA_VERSION,
      });
    }
    conn.execute_batch(SCHEMA)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(Self { conn })
  }
}

// ─── KeyValueStore impl ──────────────────────────────────────────────────────

impl KeyValueStore for SqliteStore {
  type Error = Error;

  fn get(&self, key: &str) -> Result<Option<String>> {
    let value = self
      .conn
      .query_row(
        "SELECT value FROM kv WHERE key = ?1",
        rusqlite::params![key],
        |r| r.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    self.conn.execute(
      "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
       ON CONFLICT(key) DO UPDATE SET
         value      = excluded.value,
         updated_at = excluded.updated_at",
      rusqlite::params![key, value, now],
    )?;
    Ok(())
  }
}

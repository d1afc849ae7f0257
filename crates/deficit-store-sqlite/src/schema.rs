//! SQL schema for the deficit SQLite store.
//!
//! Executed once at connection startup, after which the store stamps
//! `PRAGMA user_version` with [`SCHEMA_VERSION`] so later layouts can migrate
//! from it.

/// Revision stamped after [`SCHEMA`] runs.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Flat key/value pairs: 'history', 'favorites', 'darkMode'.
-- Values are opaque text (JSON or a stringified boolean).
CREATE TABLE IF NOT EXISTS kv (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL   -- ISO 8601 UTC
);
";

//! [`SqliteKv`]: the SQLite implementation of [`KvStore`].

use std::{
  path::Path,
  sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, params};
use tracing::info;

use quill_core::kv::KvStore;

use crate::{Error, Result, schema::SCHEMA};

/// A key-value backend stored in one SQLite table.
///
/// The connection sits behind a mutex; every call is a single short
/// statement, so contention is not a concern at blog scale.
pub struct SqliteKv {
  conn: Mutex<Connection>,
}

impl SqliteKv {
  /// Open (or create) a database at `path` and apply the schema.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    let kv = Self::init(conn)?;
    info!(path = %path.display(), "opened sqlite store");
    Ok(kv)
  }

  /// Open an in-memory database, for tests.
  pub fn open_in_memory() -> Result<Self> { Self::init(Connection::open_in_memory()?) }

  fn init(conn: Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn: Mutex::new(conn) })
  }

  fn conn(&self) -> MutexGuard<'_, Connection> {
    self.conn.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Every stored key, sorted.
  pub fn keys(&self) -> Result<Vec<String>> {
    let conn = self.conn();
    let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
    let keys = stmt
      .query_map([], |r| r.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(keys)
  }
}

impl KvStore for SqliteKv {
  type Error = Error;

  fn get(&self, key: &str) -> Result<Option<String>> {
    let value = self
      .conn()
      .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |r| r.get(0))
      .optional()?;
    Ok(value)
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.conn().execute(
      "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
       ON CONFLICT (key) DO UPDATE
         SET value = excluded.value, updated_at = excluded.updated_at",
      params![key, value, Utc::now().to_rfc3339()],
    )?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    self.conn().execute("DELETE FROM kv WHERE key = ?1", params![key])?;
    Ok(())
  }
}

//! The `KvStore` trait and the in-memory backend.
//!
//! Backends deal in text only; encoding to and from JSON happens one level up
//! in [`crate::persist::Persistence`]. Higher layers depend on this trait,
//! not on any concrete backend.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{PoisonError, RwLock},
};

/// Durable key-value storage with last-write-wins semantics.
///
/// There are no transactions. Each call either takes effect or returns an
/// error; callers propagate errors and never retry on their own.
pub trait KvStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the raw text stored at `key`. Returns `None` if absent.
  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Create or overwrite `key`.
  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

  /// Delete `key`. Removing an absent key is not an error.
  fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A process-local backend. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryKv {
  entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
  pub fn new() -> Self { Self::default() }

  /// A copy of every entry, for inspection in tests.
  pub fn snapshot(&self) -> HashMap<String, String> {
    self.entries.read().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl KvStore for MemoryKv {
  type Error = Infallible;

  fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), Infallible> {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), Infallible> {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.remove(key);
    Ok(())
  }
}

//! The typed persistence adapter: JSON records over a [`KvStore`].

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::{Error, Result, kv::KvStore};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Names of the persisted records, all sharing one namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
  prefix: String,
}

impl StorageKeys {
  pub const DEFAULT_PREFIX: &'static str = "blog";

  pub fn new(prefix: impl Into<String>) -> Self { Self { prefix: prefix.into() } }

  fn key(&self, name: &str) -> String { format!("{}_{name}", self.prefix) }

  /// The post collection.
  pub fn posts(&self) -> String { self.key("posts") }

  /// Map of post id to that post's comment list.
  pub fn comments(&self) -> String { self.key("comments") }

  pub fn current_user(&self) -> String { self.key("current_user") }

  /// Map of like key to the ids of users who liked it.
  pub fn likes(&self) -> String { self.key("likes") }

  /// `true` for the dark theme.
  pub fn theme(&self) -> String { self.key("theme") }

  pub fn selected_category(&self) -> String { self.key("selected_category") }

  pub fn all(&self) -> [String; 6] {
    [
      self.posts(),
      self.comments(),
      self.current_user(),
      self.likes(),
      self.theme(),
      self.selected_category(),
    ]
  }
}

impl Default for StorageKeys {
  fn default() -> Self { Self::new(Self::DEFAULT_PREFIX) }
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

/// Serialises records to JSON text on write and parses them on read.
///
/// Cloning is cheap; clones share the same backend.
pub struct Persistence<K> {
  kv:   Arc<K>,
  keys: StorageKeys,
}

impl<K> Clone for Persistence<K> {
  fn clone(&self) -> Self { Self { kv: Arc::clone(&self.kv), keys: self.keys.clone() } }
}

impl<K: KvStore> Persistence<K> {
  pub fn new(kv: Arc<K>, keys: StorageKeys) -> Self { Self { kv, keys } }

  pub fn keys(&self) -> &StorageKeys { &self.keys }

  pub fn backend(&self) -> &K { &self.kv }

  /// Read and decode `key`; an absent key yields `T::default()`.
  pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
    let Some(raw) = self.kv.get(key).map_err(Error::storage)? else {
      return Ok(T::default());
    };
    serde_json::from_str(&raw).map_err(|e| {
      warn!(key, error = %e, "persisted record failed to decode");
      Error::storage(e)
    })
  }

  pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(Error::storage)?;
    self.kv.set(key, &raw).map_err(Error::storage)
  }

  pub fn remove(&self, key: &str) -> Result<()> {
    self.kv.remove(key).map_err(Error::storage)
  }

  /// Remove every record in this namespace.
  pub fn clear_all(&self) -> Result<()> {
    for key in self.keys.all() {
      self.remove(&key)?;
    }
    Ok(())
  }
}

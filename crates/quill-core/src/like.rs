//! Like-sets: which users have liked which post or comment.
//!
//! The set is the only source of truth for like counts. Persisted as a JSON
//! object mapping `"{kind}_{id}"` to the list of user ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::user::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Post,
  Comment,
}

impl EntityKind {
  pub fn as_str(self) -> &'static str {
    match self {
      EntityKind::Post => "post",
      EntityKind::Comment => "comment",
    }
  }
}

/// The entity a like applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikeTarget {
  pub kind: EntityKind,
  pub id:   i64,
}

impl LikeTarget {
  pub fn post(id: i64) -> Self { Self { kind: EntityKind::Post, id } }

  pub fn comment(id: i64) -> Self { Self { kind: EntityKind::Comment, id } }

  pub fn key(&self) -> String { format!("{}_{}", self.kind.as_str(), self.id) }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeBook(BTreeMap<String, Vec<UserId>>);

impl LikeBook {
  pub fn count(&self, target: &LikeTarget) -> usize {
    self.0.get(&target.key()).map_or(0, Vec::len)
  }

  pub fn contains(&self, target: &LikeTarget, user: UserId) -> bool {
    self.0.get(&target.key()).is_some_and(|users| users.contains(&user))
  }

  /// Add `user` if absent, remove it if present. Returns the new count.
  pub fn toggle(&mut self, target: &LikeTarget, user: UserId) -> usize {
    let key = target.key();
    let users = self.0.entry(key.clone()).or_default();
    match users.iter().position(|u| *u == user) {
      Some(i) => {
        users.remove(i);
      }
      None => users.push(user),
    }
    let count = users.len();
    if count == 0 {
      self.0.remove(&key);
    }
    count
  }

  /// Drop the whole like-set for `target`.
  pub fn forget(&mut self, target: &LikeTarget) { self.0.remove(&target.key()); }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

//! Users and the author snapshots copied onto posts and comments.

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Counters shown on a user's profile card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
  pub articles:  u32,
  pub followers: u64,
}

/// The session identity. Assigned wholesale at login and never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:     UserId,
  pub name:   String,
  pub avatar: String,
  pub role:   String,
  #[serde(default)]
  pub bio:    String,
  #[serde(default)]
  pub stats:  UserStats,
}

impl User {
  /// Copy the fields that travel with authored content.
  pub fn snapshot(&self) -> Author {
    Author {
      id:     self.id,
      name:   self.name.clone(),
      avatar: self.avatar.clone(),
      role:   self.role.clone(),
    }
  }
}

/// A by-value copy of a user taken when content is created. Later changes to
/// the user never reach existing posts or comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  pub id:     UserId,
  pub name:   String,
  pub avatar: String,
  pub role:   String,
}

//! The session holder and the identity-provider seam.
//!
//! [`Session`] keeps at most one current user and mirrors it into storage.
//! Where that user comes from is the business of an [`IdentityProvider`]; the
//! bundled [`MockIdentity`] accepts any non-blank credentials.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  Result,
  kv::KvStore,
  persist::Persistence,
  post::require_text,
  user::{User, UserStats},
};

// ─── Identity provider ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

/// Turns credentials into a verified user snapshot.
pub trait IdentityProvider: Send + Sync {
  fn authenticate(&self, credentials: &Credentials) -> Result<User>;
}

/// Stands in for a real provider: any non-blank credentials log in as a
/// fixed user.
#[derive(Debug, Clone)]
pub struct MockIdentity {
  user: User,
}

impl MockIdentity {
  pub fn new(user: User) -> Self { Self { user } }
}

impl Default for MockIdentity {
  fn default() -> Self { Self::new(demo_user()) }
}

impl IdentityProvider for MockIdentity {
  fn authenticate(&self, credentials: &Credentials) -> Result<User> {
    require_text("email", &credentials.email)?;
    require_text("password", &credentials.password)?;
    Ok(self.user.clone())
  }
}

pub fn demo_user() -> User {
  User {
    id:     1,
    name:   "Demo User".into(),
    avatar: "/api/placeholder/100/100?text=DU".into(),
    role:   "Writer".into(),
    bio:    "A passionate writer sharing thoughts and ideas".into(),
    stats:  UserStats { articles: 5, followers: 100 },
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

pub struct Session<K> {
  persist: Persistence<K>,
  current: Option<User>,
}

impl<K: KvStore> Session<K> {
  /// Restore the persisted user, if any.
  pub fn open(persist: Persistence<K>) -> Result<Self> {
    let current: Option<User> = persist.load(&persist.keys().current_user())?;
    Ok(Self { persist, current })
  }

  pub fn current(&self) -> Option<&User> { self.current.as_ref() }

  /// Replace the current user unconditionally.
  pub fn login(&mut self, user: User) -> Result<&User> {
    self.persist.save(&self.persist.keys().current_user(), &user)?;
    info!(user_id = user.id, "logged in");
    Ok(&*self.current.insert(user))
  }

  /// Forget the current user. Memory is cleared even if the storage write
  /// fails; the failure is still returned.
  pub fn logout(&mut self) -> Result<()> {
    if let Some(user) = self.current.take() {
      info!(user_id = user.id, "logged out");
    }
    self.persist.remove(&self.persist.keys().current_user())
  }

  pub(crate) fn reset(&mut self) { self.current = None; }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::{Error, kv::MemoryKv, persist::StorageKeys};

  fn persistence() -> Persistence<MemoryKv> {
    Persistence::new(Arc::new(MemoryKv::new()), StorageKeys::default())
  }

  #[test]
  fn mock_rejects_blank_credentials() {
    let id = MockIdentity::default();
    let err = id
      .authenticate(&Credentials { email: " ".into(), password: "x".into() })
      .unwrap_err();
    assert!(matches!(err, Error::ValidationFailed { field: "email", .. }));

    let user = id
      .authenticate(&Credentials { email: "a@b.c".into(), password: "x".into() })
      .unwrap();
    assert_eq!(user, demo_user());
  }

  #[test]
  fn login_survives_reopen_and_logout_clears_it() {
    let p = persistence();
    let mut session = Session::open(p.clone()).unwrap();
    assert!(session.current().is_none());

    session.login(demo_user()).unwrap();
    assert_eq!(Session::open(p.clone()).unwrap().current(), Some(&demo_user()));

    session.logout().unwrap();
    assert!(session.current().is_none());
    assert!(Session::open(p.clone()).unwrap().current().is_none());
    assert!(!p.backend().snapshot().contains_key("blog_current_user"));
  }

  #[test]
  fn login_replaces_without_merging() {
    let mut session = Session::open(persistence()).unwrap();
    session.login(demo_user()).unwrap();

    let other = User {
      id:     2,
      name:   "Jane Smith".into(),
      avatar: String::new(),
      role:   "UX Designer".into(),
      bio:    String::new(),
      stats:  UserStats::default(),
    };
    session.login(other.clone()).unwrap();
    assert_eq!(session.current(), Some(&other));
  }
}

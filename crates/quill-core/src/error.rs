//! Error types for `quill-core`.

use std::fmt;

use thiserror::Error;

use crate::{comment::CommentId, post::PostId};

/// The entity an operation referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
  Post(PostId),
  Comment(CommentId),
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Entity::Post(id) => write!(f, "post {id}"),
      Entity::Comment(id) => write!(f, "comment {id}"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// A mutation needed a current user and there was none.
  #[error("no user is logged in")]
  Unauthenticated,

  #[error("{0} not found")]
  NotFound(Entity),

  #[error("invalid {field}: {reason}")]
  ValidationFailed {
    field:  &'static str,
    reason: &'static str,
  },

  /// The key-value backend or the JSON codec failed.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }

  pub(crate) fn blank(field: &'static str) -> Self {
    Self::ValidationFailed { field, reason: "must not be blank" }
  }

  /// True for conditions the caller is expected to surface to the user
  /// rather than treat as a defect.
  pub fn is_user_error(&self) -> bool {
    matches!(self, Self::Unauthenticated | Self::ValidationFailed { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn user_errors_are_the_expected_rejections() {
    assert!(Error::Unauthenticated.is_user_error());
    assert!(Error::blank("title").is_user_error());
    assert!(!Error::NotFound(Entity::Post(1)).is_user_error());
    assert!(!Error::storage(fmt::Error).is_user_error());
  }
}

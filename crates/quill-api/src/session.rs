//! Handlers for `/session`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/session` | The current user, or `null` |
//! | `POST`   | `/session` | Body: `{"email":"...","password":"..."}` |
//! | `DELETE` | `/session` | 204 |

use axum::{Json, extract::State, http::StatusCode};
use quill_core::{
  kv::KvStore,
  session::{Credentials, IdentityProvider},
  user::User,
};

use crate::{SharedBlog, error::ApiError};

/// `GET /session`
pub async fn current<K, P>(State(blog): State<SharedBlog<K, P>>) -> Json<Option<User>>
where
  K: KvStore,
  P: IdentityProvider,
{
  Json(blog.lock().await.current_user().cloned())
}

/// `POST /session`
pub async fn login<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Json(credentials): Json<Credentials>,
) -> Result<Json<User>, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let mut blog = blog.lock().await;
  let user = blog.login(&credentials)?.clone();
  Ok(Json(user))
}

/// `DELETE /session`
pub async fn logout<K, P>(State(blog): State<SharedBlog<K, P>>) -> Result<StatusCode, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  blog.lock().await.logout()?;
  Ok(StatusCode::NO_CONTENT)
}

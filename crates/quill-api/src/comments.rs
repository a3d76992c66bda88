//! Handlers for comment threads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/posts/{id}/comments` | Newest first; empty for an unknown post |
//! | `POST` | `/posts/{id}/comments` | Body: `{"content":"..."}`; 201 |
//! | `POST` | `/posts/{id}/comments/{comment_id}/replies` | Same body; 201 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use quill_core::{
  comment::{CommentId, CommentView},
  kv::KvStore,
  post::PostId,
  session::IdentityProvider,
};
use serde::Deserialize;

use crate::{SharedBlog, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub content: String,
}

/// `GET /posts/{id}/comments`
pub async fn list<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Path(id): Path<PostId>,
) -> Json<Vec<CommentView>>
where
  K: KvStore,
  P: IdentityProvider,
{
  Json(blog.lock().await.comments(id))
}

/// `POST /posts/{id}/comments`
pub async fn create<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Path(id): Path<PostId>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let comment = blog.lock().await.add_comment(id, &body.content)?;
  Ok((StatusCode::CREATED, Json(comment)))
}

/// `POST /posts/{id}/comments/{comment_id}/replies`
pub async fn reply<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Path((id, comment_id)): Path<(PostId, CommentId)>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let reply = blog.lock().await.add_reply(id, comment_id, &body.content)?;
  Ok((StatusCode::CREATED, Json(reply)))
}

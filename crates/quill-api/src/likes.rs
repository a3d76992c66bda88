//! Handler for `POST /likes`.

use axum::{Json, extract::State};
use quill_core::{kv::KvStore, like::LikeTarget, session::IdentityProvider};
use serde::{Deserialize, Serialize};

use crate::{SharedBlog, error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeState {
  pub likes: usize,
  /// Whether the current user now likes the target.
  pub liked: bool,
}

/// `POST /likes`, body: `{"kind":"post","id":17}`
pub async fn toggle<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Json(target): Json<LikeTarget>,
) -> Result<Json<LikeState>, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let mut blog = blog.lock().await;
  let likes = blog.toggle_like(target)?;
  let liked = blog.has_liked(&target);
  Ok(Json(LikeState { likes, liked }))
}

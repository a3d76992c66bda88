//! Handlers for `/posts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Optional `?category=<name>&q=<text>` |
//! | `POST`   | `/posts` | Body: a post draft; 201 |
//! | `GET`    | `/posts/{id}` | 404 if not found |
//! | `PATCH`  | `/posts/{id}` | Body: the fields to overwrite |
//! | `DELETE` | `/posts/{id}` | 204, also for an unknown id |
//! | `POST`   | `/posts/{id}/view` | `{"count": n}` |
//! | `POST`   | `/posts/{id}/share` | `{"count": n}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use quill_core::{
  kv::KvStore,
  post::{PostDraft, PostId, PostPatch, PostView},
  search::search,
  session::IdentityProvider,
  views::{ALL_CATEGORIES, filter_by_category},
};
use serde::{Deserialize, Serialize};

use crate::{SharedBlog, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Keep only posts in this category. `All` keeps everything.
  pub category: Option<String>,
  /// Free-text search over title, excerpt, categories and author.
  pub q:        Option<String>,
}

/// `GET /posts[?category=<name>][&q=<text>]`
pub async fn list<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Query(params): Query<ListParams>,
) -> Json<Vec<PostView>>
where
  K: KvStore,
  P: IdentityProvider,
{
  let posts = blog.lock().await.list_posts();
  let category = params.category.as_deref().unwrap_or(ALL_CATEGORIES);
  let in_category = filter_by_category(&posts, category);

  let matched = match params.q.as_deref().map(str::trim) {
    Some(q) if !q.is_empty() => search(in_category, q),
    _ => in_category,
  };
  Json(matched.into_iter().cloned().collect())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /posts`
pub async fn create<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Json(draft): Json<PostDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let post = blog.lock().await.create_post(draft)?;
  Ok((StatusCode::CREATED, Json(post)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /posts/{id}`
pub async fn get_one<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Path(id): Path<PostId>,
) -> Result<Json<PostView>, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let post = blog
    .lock()
    .await
    .get_post(id)
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;
  Ok(Json(post))
}

// ─── Update / delete ──────────────────────────────────────────────────────────

/// `PATCH /posts/{id}`
pub async fn update<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Path(id): Path<PostId>,
  Json(patch): Json<PostPatch>,
) -> Result<Json<PostView>, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  if patch.is_empty() {
    return Err(ApiError::BadRequest("patch has no fields".into()));
  }
  let post = blog.lock().await.update_post(id, patch)?;
  Ok(Json(post))
}

/// `DELETE /posts/{id}`
pub async fn delete<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Path(id): Path<PostId>,
) -> Result<StatusCode, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  blog.lock().await.delete_post(id)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Counters ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Counter {
  pub count: u64,
}

/// `POST /posts/{id}/view`
pub async fn view<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Path(id): Path<PostId>,
) -> Result<Json<Counter>, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let count = blog.lock().await.record_view(id)?;
  Ok(Json(Counter { count }))
}

/// `POST /posts/{id}/share`
pub async fn share<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Path(id): Path<PostId>,
) -> Result<Json<Counter>, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let count = blog.lock().await.record_share(id)?;
  Ok(Json(Counter { count }))
}

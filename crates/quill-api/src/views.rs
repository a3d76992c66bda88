//! Handlers for the derived sidebar views.
//!
//! `GET /trending` and `GET /popular` take an optional `?limit=` (default 4).

use axum::{
  Json,
  extract::{Query, State},
};
use quill_core::{
  kv::KvStore,
  post::PostView,
  session::IdentityProvider,
  views::{CategoryCount, DEFAULT_TOP_N, TopicStat},
};
use serde::Deserialize;

use crate::SharedBlog;

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
  pub limit: Option<usize>,
}

impl LimitParams {
  fn limit(&self) -> usize { self.limit.unwrap_or(DEFAULT_TOP_N) }
}

/// `GET /trending[?limit=<n>]`
pub async fn trending<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Query(params): Query<LimitParams>,
) -> Json<Vec<TopicStat>>
where
  K: KvStore,
  P: IdentityProvider,
{
  Json(blog.lock().await.trending_topics(params.limit()))
}

/// `GET /popular[?limit=<n>]`
pub async fn popular<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Query(params): Query<LimitParams>,
) -> Json<Vec<PostView>>
where
  K: KvStore,
  P: IdentityProvider,
{
  Json(blog.lock().await.popular_posts(params.limit()))
}

/// `GET /categories`
pub async fn categories<K, P>(State(blog): State<SharedBlog<K, P>>) -> Json<Vec<CategoryCount>>
where
  K: KvStore,
  P: IdentityProvider,
{
  Json(blog.lock().await.category_counts())
}

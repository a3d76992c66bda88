//! JSON REST API for Quill.
//!
//! Exposes an axum [`Router`] over a shared [`Blog`]. Every handler takes the
//! lock, runs one store operation and releases it, so requests are applied
//! one at a time. TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", quill_api::api_router(blog.clone()))
//! ```

pub mod comments;
pub mod error;
pub mod likes;
pub mod posts;
pub mod preferences;
pub mod session;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use quill_core::{Blog, kv::KvStore, session::IdentityProvider};
use tokio::sync::Mutex;

pub use error::ApiError;

/// The state every handler shares.
pub type SharedBlog<K, P> = Arc<Mutex<Blog<K, P>>>;

/// Build a fully-materialised API router for `blog`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<K, P>(blog: SharedBlog<K, P>) -> Router<()>
where
  K: KvStore + 'static,
  P: IdentityProvider + 'static,
{
  Router::new()
    // Posts
    .route("/posts", get(posts::list::<K, P>).post(posts::create::<K, P>))
    .route(
      "/posts/{id}",
      get(posts::get_one::<K, P>)
        .patch(posts::update::<K, P>)
        .delete(posts::delete::<K, P>),
    )
    .route("/posts/{id}/view", post(posts::view::<K, P>))
    .route("/posts/{id}/share", post(posts::share::<K, P>))
    // Comments
    .route(
      "/posts/{id}/comments",
      get(comments::list::<K, P>).post(comments::create::<K, P>),
    )
    .route("/posts/{id}/comments/{comment_id}/replies", post(comments::reply::<K, P>))
    // Likes
    .route("/likes", post(likes::toggle::<K, P>))
    // Derived views
    .route("/trending", get(views::trending::<K, P>))
    .route("/popular", get(views::popular::<K, P>))
    .route("/categories", get(views::categories::<K, P>))
    // Session and preferences
    .route(
      "/session",
      get(session::current::<K, P>)
        .post(session::login::<K, P>)
        .delete(session::logout::<K, P>),
    )
    .route(
      "/preferences",
      get(preferences::get::<K, P>).put(preferences::update::<K, P>),
    )
    .with_state(blog)
}

#[cfg(test)]
mod tests;

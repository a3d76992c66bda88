//! Server wiring for Quill: configuration, store opening and the HTTP router.
//!
//! The binary in `main.rs` is a thin shell over these functions.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use chrono::Utc;
use quill_api::{SharedBlog, api_router};
use quill_core::{
  Blog,
  kv::KvStore,
  persist::StorageKeys,
  seed::generate_posts,
  session::{IdentityProvider, MockIdentity},
};
use quill_store_sqlite::SqliteKv;
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `QUILL_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Namespace for every persisted record.
  pub key_prefix: String,
  /// Sample posts to generate when the store is empty. Zero disables.
  pub seed_posts: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       5233,
      store_path: PathBuf::from("quill.db"),
      key_prefix: StorageKeys::DEFAULT_PREFIX.to_string(),
      seed_posts: 0,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `QUILL_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("QUILL"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Open the SQLite file named by `config` and load the blog from it.
pub fn open_blog(config: &ServerConfig) -> anyhow::Result<Blog<SqliteKv>> {
  let store_path = expand_tilde(&config.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let kv = SqliteKv::open(&store_path)
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let blog = Blog::open(
    Arc::new(kv),
    StorageKeys::new(config.key_prefix.clone()),
    MockIdentity::default(),
  )
  .context("failed to load blog records")?;
  Ok(blog)
}

/// Fill an empty store with `count` generated posts.
pub fn seed<K: KvStore, P: IdentityProvider>(
  blog: &mut Blog<K, P>,
  count: usize,
) -> anyhow::Result<usize> {
  if count == 0 {
    return Ok(0);
  }
  let posts = generate_posts(&mut rand::rng(), count, Utc::now());
  let added = blog.seed_if_empty(posts).context("failed to seed posts")?;
  if added > 0 {
    info!(added, "seeded sample posts");
  }
  Ok(added)
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with request tracing.
pub fn router<K, P>(blog: SharedBlog<K, P>) -> Router
where
  K: KvStore + 'static,
  P: IdentityProvider + 'static,
{
  Router::new()
    .nest("/api", api_router(blog))
    .layer(TraceLayer::new_for_http())
}

/// Wrap a blog for sharing between request handlers.
pub fn share<K, P>(blog: Blog<K, P>) -> SharedBlog<K, P> { Arc::new(Mutex::new(blog)) }

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

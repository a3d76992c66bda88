//! quill-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, optionally seeds sample posts, and serves the JSON API under
//! `/api`.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use quill_server::{ServerConfig, open_blog, router, seed, share};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Quill blog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Generate this many sample posts if the store is empty. Overrides
  /// `seed_posts` from the configuration.
  #[arg(long)]
  seed: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  let mut blog = open_blog(&server_cfg)?;
  seed(&mut blog, cli.seed.unwrap_or(server_cfg.seed_posts))?;

  let app = router(share(blog));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

//! quoteshelf server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `QUOTESHELF_*` environment variables, opens the SQLite store, and serves
//! the JSON API over HTTP.
//!
//! # Admin accounts
//!
//! Users register through `POST /signup`. To grant admin rights:
//!
//! ```text
//! cargo run -p quoteshelf-api --bin server -- --promote-admin alice
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use quoteshelf_api::{AppState, ServerConfig};
use quoteshelf_catalog::{BookService, GoogleBooksClient, SearchCache};
use quoteshelf_core::store::LibraryStore;
use quoteshelf_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "quoteshelf API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Grant admin rights to an existing user and exit.
  #[arg(long, value_name = "USERNAME")]
  promote_admin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8000)?
    .set_default("store_path", "~/.local/share/quoteshelf/quoteshelf.db")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("QUOTESHELF"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: promote a user and exit.
  if let Some(username) = cli.promote_admin {
    let user = store
      .set_admin(&username, true)
      .await
      .context("failed to update user")?
      .with_context(|| format!("no user named {username:?}"))?;
    tracing::info!(user_id = %user.user_id, "promoted {} to admin", user.username);
    return Ok(());
  }

  // Build application state.
  let catalog = GoogleBooksClient::new(server_cfg.client_config())
    .context("failed to build catalog client")?;
  let books = BookService::new(catalog, SearchCache::new(server_cfg.search_cache_ttl()));
  let state = AppState::new(store, books);

  let app = quoteshelf_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

//! JSON HTTP API for quoteshelf.
//!
//! Exposes an axum [`Router`] backed by any [`LibraryStore`] and [`Catalog`].
//! Every route except `/signup` and `/login` requires a bearer token issued
//! by one of those two.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{delete, get, post},
};
use quoteshelf_catalog::{BookService, Catalog, client::ClientConfig};
use quoteshelf_core::store::LibraryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{accounts, books, comments, favorites, quotes, reactions, tags};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `QUOTESHELF_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  #[serde(default = "default_catalog_base_url")]
  pub catalog_base_url:      String,
  #[serde(default)]
  pub catalog_api_key:       Option<String>,
  #[serde(default = "default_catalog_max_results")]
  pub catalog_max_results:   u32,
  #[serde(default = "default_catalog_timeout_secs")]
  pub catalog_timeout_secs:  u64,
  #[serde(default = "default_search_cache_ttl_secs")]
  pub search_cache_ttl_secs: u64,
}

fn default_catalog_base_url() -> String {
  quoteshelf_catalog::client::DEFAULT_BASE_URL.to_string()
}

fn default_catalog_max_results() -> u32 { 20 }

fn default_catalog_timeout_secs() -> u64 { 10 }

fn default_search_cache_ttl_secs() -> u64 { 3600 }

impl ServerConfig {
  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      base_url:    self.catalog_base_url.clone(),
      api_key:     self.catalog_api_key.clone().filter(|k| !k.is_empty()),
      max_results: self.catalog_max_results,
      timeout:     Duration::from_secs(self.catalog_timeout_secs),
    }
  }

  pub fn search_cache_ttl(&self) -> Duration {
    Duration::from_secs(self.search_cache_ttl_secs)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C> {
  pub store: Arc<S>,
  pub books: Arc<BookService<C>>,
}

impl<S, C> AppState<S, C> {
  pub fn new(store: S, books: BookService<C>) -> Self {
    Self { store: Arc::new(store), books: Arc::new(books) }
  }
}

// Derived `Clone` would require `S: Clone` and `C: Clone`.
impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), books: Arc::clone(&self.books) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`].
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  Router::new()
    // Accounts
    .route("/signup", post(accounts::signup::<S, C>))
    .route("/login", post(accounts::login::<S, C>))
    .route("/logout", post(accounts::logout::<S, C>))
    .route("/user", get(accounts::current))
    .route("/users", get(accounts::list::<S, C>))
    .route("/users/{id}", delete(accounts::remove::<S, C>))
    // Books
    .route("/api/books/search", get(books::search::<S, C>))
    .route("/api/books", get(books::list::<S, C>).post(books::create::<S, C>))
    .route("/api/books/{external_id}", get(books::get_one::<S, C>))
    // Quotes
    .route("/api/quotes", get(quotes::list::<S, C>).post(quotes::create::<S, C>))
    .route("/api/quotes/feed", get(quotes::feed::<S, C>))
    .route(
      "/api/quotes/{id}",
      get(quotes::get_one::<S, C>)
        .put(quotes::update::<S, C>)
        .delete(quotes::remove::<S, C>),
    )
    .route(
      "/api/quotes/{id}/reactions",
      get(reactions::list::<S, C>).post(reactions::toggle::<S, C>),
    )
    .route(
      "/api/quotes/{id}/comments",
      get(comments::list::<S, C>).post(comments::create::<S, C>),
    )
    // Comments
    .route(
      "/api/comments/{id}",
      get(comments::get_one::<S, C>)
        .put(comments::update::<S, C>)
        .delete(comments::remove::<S, C>),
    )
    // Tags
    .route("/api/tags", get(tags::list::<S, C>).post(tags::create::<S, C>))
    .route("/api/tags/{id}", get(tags::get_one::<S, C>).delete(tags::remove::<S, C>))
    // Favorites
    .route(
      "/api/favorites",
      get(favorites::list::<S, C>).post(favorites::create::<S, C>),
    )
    .route("/api/favorites/{id}", delete(favorites::remove::<S, C>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

//! Handlers for `/api/books` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/books/search?q=` | Catalog search, served from the cache when possible |
//! | `GET`  | `/api/books` | Locally persisted books |
//! | `POST` | `/api/books` | Body: `{"external_id":"..."}`; materializes the book |
//! | `GET`  | `/api/books/:external_id` | Materializes on first reference |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
};
use quoteshelf_catalog::Catalog;
use quoteshelf_core::{
  book::{Book, BookSummary},
  store::LibraryStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::CurrentUser, error::ApiError};

/// Resolve `external_id` to a local book, or 404 if the catalog does not know
/// it either. A blank id is rejected before the catalog is consulted.
pub(crate) async fn materialize<S, C>(
  state: &AppState<S, C>,
  external_id: &str,
) -> Result<Book, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let external_id = external_id.trim();
  if external_id.is_empty() {
    return Err(ApiError::BadRequest("external_id may not be blank".into()));
  }
  state
    .books
    .get_or_create(state.store.as_ref(), external_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Book"))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  #[serde(default)]
  pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
  pub books: Vec<BookSummary>,
  pub query: String,
}

/// `GET /api/books/search?q=<query>`
pub async fn search<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  Query(params): Query<SearchParams>,
) -> Json<SearchResults>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let books = state.books.search(&params.q).await;
  Json(SearchResults { books, query: params.q })
}

// ─── List / create / get ──────────────────────────────────────────────────────

/// `GET /api/books`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
) -> Result<Json<Vec<Book>>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let books = state.store.list_books().await.map_err(ApiError::store)?;
  Ok(Json(books))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub external_id: String,
}

/// `POST /api/books`: idempotent; repeated calls return the same book.
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Json<Book>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  Ok(Json(materialize(&state, &body.external_id).await?))
}

/// `GET /api/books/:external_id`
pub async fn get_one<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  Path(external_id): Path<String>,
) -> Result<Json<Book>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  Ok(Json(materialize(&state, &external_id).await?))
}

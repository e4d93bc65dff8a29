//! Handlers for `/api/quotes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/quotes` | Optional `?user_id`, `?book_id`, `?tag`, `?limit`, `?offset` |
//! | `POST`   | `/api/quotes` | Body: `{"book":"<external id>","text":"...","context":"...","tags":[...]}` |
//! | `GET`    | `/api/quotes/feed` | `?limit` (default 50), `?offset` |
//! | `GET`    | `/api/quotes/:id` | Quote with its book |
//! | `PUT`    | `/api/quotes/:id` | Owner only |
//! | `DELETE` | `/api/quotes/:id` | Owner only; cascades reactions and comments |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use quoteshelf_catalog::Catalog;
use quoteshelf_core::{
  quote::{FeedEntry, NewQuote, Quote, QuoteDetail, QuoteQuery, QuoteUpdate},
  store::LibraryStore,
  tag::{normalize_tag_name, normalize_tag_names},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{books::materialize, require_quote};
use crate::{AppState, auth::CurrentUser, error::ApiError};

pub const DEFAULT_FEED_LIMIT: usize = 50;

fn require_text(text: &str) -> Result<String, ApiError> {
  let text = text.trim();
  if text.is_empty() {
    return Err(ApiError::BadRequest("Quote text may not be blank".into()));
  }
  Ok(text.to_string())
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id: Option<Uuid>,
  pub book_id: Option<Uuid>,
  pub tag:     Option<String>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

/// `GET /api/quotes`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Quote>>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Query(params) = params?;
  let query = QuoteQuery {
    user_id: params.user_id,
    book_id: params.book_id,
    tag:     params.tag.as_deref().map(normalize_tag_name).transpose()?,
    limit:   params.limit,
    offset:  params.offset,
  };
  let quotes = state.store.list_quotes(&query).await.map_err(ApiError::store)?;
  Ok(Json(quotes))
}

// ─── Feed ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FeedParams {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Feed {
  pub quotes: Vec<FeedEntry>,
}

/// `GET /api/quotes/feed`
pub async fn feed<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  params: Result<Query<FeedParams>, QueryRejection>,
) -> Result<Json<Feed>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Query(params) = params?;
  let quotes = state
    .store
    .feed(
      params.limit.unwrap_or(DEFAULT_FEED_LIMIT),
      params.offset.unwrap_or(0),
    )
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Feed { quotes }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  /// External catalog id of the quoted book.
  pub book:    String,
  pub text:    String,
  #[serde(default)]
  pub context: String,
  #[serde(default)]
  pub tags:    Vec<String>,
}

/// `POST /api/quotes`: returns 201 + the quote with its book.
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  let text = require_text(&body.text)?;
  let tags = normalize_tag_names(&body.tags)?;
  let book = materialize(&state, &body.book).await?;

  let quote = state
    .store
    .create_quote(NewQuote {
      user_id: user.user_id,
      book_id: book.book_id,
      text,
      context: body.context.trim().to_string(),
      tags,
    })
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(quote_id = %quote.quote_id, book = %book.external_id, "created quote");
  Ok((StatusCode::CREATED, Json(QuoteDetail { quote, book })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /api/quotes/:id`
pub async fn get_one<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<QuoteDetail>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let quote = require_quote(state.store.as_ref(), id).await?;
  let book = state
    .store
    .get_book(quote.book_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Book"))?;
  Ok(Json(QuoteDetail { quote, book }))
}

// ─── Update / delete ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub text:    Option<String>,
  pub context: Option<String>,
  pub tags:    Option<Vec<String>>,
}

/// `PUT /api/quotes/:id`: absent fields are left unchanged; `tags`, when
/// present, replaces the whole set.
pub async fn update<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  Path(id): Path<Uuid>,
  payload: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Quote>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  let existing = require_quote(state.store.as_ref(), id).await?;
  if existing.user_id != user.user_id {
    return Err(ApiError::forbidden());
  }

  let update = QuoteUpdate {
    text:    body.text.as_deref().map(require_text).transpose()?,
    context: body.context.map(|c| c.trim().to_string()),
    tags:    body.tags.map(normalize_tag_names).transpose()?,
  };
  let quote = state
    .store
    .update_quote(id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Quote"))?;
  Ok(Json(quote))
}

/// `DELETE /api/quotes/:id`
pub async fn remove<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let existing = require_quote(state.store.as_ref(), id).await?;
  if existing.user_id != user.user_id {
    return Err(ApiError::forbidden());
  }
  state.store.delete_quote(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

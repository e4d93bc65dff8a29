//! Handlers for comment endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/quotes/:id/comments` | Oldest first |
//! | `POST`   | `/api/quotes/:id/comments` | Body: `{"content":"...","parent_id":null}` |
//! | `GET`    | `/api/comments/:id` | |
//! | `PUT`    | `/api/comments/:id` | Author only; body `{"content":"..."}` |
//! | `DELETE` | `/api/comments/:id` | Author only; replies go with it |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use quoteshelf_catalog::Catalog;
use quoteshelf_core::{
  comment::{Comment, NewComment},
  store::LibraryStore,
};
use serde::Deserialize;
use uuid::Uuid;

use super::require_quote;
use crate::{AppState, auth::CurrentUser, error::ApiError};

fn require_content(content: &str) -> Result<String, ApiError> {
  let content = content.trim();
  if content.is_empty() {
    return Err(ApiError::BadRequest("Comment may not be blank".into()));
  }
  Ok(content.to_string())
}

async fn require_comment<S: LibraryStore>(store: &S, id: Uuid) -> Result<Comment, ApiError> {
  store
    .get_comment(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Comment"))
}

// ─── Per quote ────────────────────────────────────────────────────────────────

/// `GET /api/quotes/:id/comments`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  Path(quote_id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  require_quote(state.store.as_ref(), quote_id).await?;
  let comments = state
    .store
    .list_comments(quote_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(comments))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub content:   String,
  pub parent_id: Option<Uuid>,
}

/// `POST /api/quotes/:id/comments`
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  Path(quote_id): Path<Uuid>,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  let content = require_content(&body.content)?;
  require_quote(state.store.as_ref(), quote_id).await?;

  if let Some(parent_id) = body.parent_id {
    let parent = require_comment(state.store.as_ref(), parent_id).await?;
    if parent.quote_id != quote_id {
      return Err(ApiError::BadRequest(
        "Parent comment belongs to a different quote".into(),
      ));
    }
  }

  let comment = state
    .store
    .add_comment(NewComment {
      user_id: user.user_id,
      quote_id,
      parent_id: body.parent_id,
      content,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(comment)))
}

// ─── Single comment ───────────────────────────────────────────────────────────

/// `GET /api/comments/:id`
pub async fn get_one<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  Ok(Json(require_comment(state.store.as_ref(), id).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub content: String,
}

/// `PUT /api/comments/:id`
pub async fn update<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  Path(id): Path<Uuid>,
  payload: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Comment>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  let content = require_content(&body.content)?;
  let existing = require_comment(state.store.as_ref(), id).await?;
  if existing.user_id != user.user_id {
    return Err(ApiError::forbidden());
  }
  let comment = state
    .store
    .update_comment(id, content)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Comment"))?;
  Ok(Json(comment))
}

/// `DELETE /api/comments/:id`
pub async fn remove<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let existing = require_comment(state.store.as_ref(), id).await?;
  if existing.user_id != user.user_id {
    return Err(ApiError::forbidden());
  }
  state.store.delete_comment(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

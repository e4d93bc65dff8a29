//! Handlers for `/api/favorites` endpoints. Every route acts on the caller's
//! own favorites.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use quoteshelf_catalog::Catalog;
use quoteshelf_core::{
  favorite::{Favorite, FavoriteDetail},
  store::LibraryStore,
};
use serde::Deserialize;
use uuid::Uuid;

use super::books::materialize;
use crate::{AppState, auth::CurrentUser, error::ApiError};

/// `GET /api/favorites`: newest first.
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
) -> Result<Json<Vec<FavoriteDetail>>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let favorites = state
    .store
    .list_favorites(user.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(favorites))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub external_id: String,
}

/// `POST /api/favorites`: 409 if the book is already a favorite.
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
  let book = materialize(&state, &body.external_id).await?;
  let favorite: Favorite = state
    .store
    .add_favorite(user.user_id, book.book_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Conflict("Book is already in your favorites".into()))?;
  Ok((StatusCode::CREATED, Json(favorite)))
}

/// `DELETE /api/favorites/:id`
pub async fn remove<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let favorite = state
    .store
    .get_favorite(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Favorite"))?;
  if favorite.user_id != user.user_id {
    return Err(ApiError::forbidden());
  }
  state.store.remove_favorite(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

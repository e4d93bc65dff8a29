//! Handlers for `/api/tags` endpoints.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
};
use quoteshelf_catalog::Catalog;
use quoteshelf_core::{store::LibraryStore, tag::{Tag, normalize_tag_name}};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::{AdminUser, CurrentUser},
  error::ApiError,
};

/// `GET /api/tags`: ordered by name.
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
) -> Result<Json<Vec<Tag>>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let tags = state.store.list_tags().await.map_err(ApiError::store)?;
  Ok(Json(tags))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /api/tags`: returns the existing tag when the normalised name is
/// already taken.
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Json<Tag>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  let name = normalize_tag_name(&body.name)?;
  let tag = state.store.get_or_create_tag(name).await.map_err(ApiError::store)?;
  Ok(Json(tag))
}

/// `GET /api/tags/:id`
pub async fn get_one<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Tag>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  state
    .store
    .get_tag(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Tag"))
}

/// `DELETE /api/tags/:id`: admin only.
pub async fn remove<S, C>(
  State(state): State<AppState<S, C>>,
  _admin: AdminUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  if !state.store.delete_tag(id).await.map_err(ApiError::store)? {
    return Err(ApiError::not_found("Tag"));
  }
  Ok(StatusCode::NO_CONTENT)
}

//! Handlers for `/api/quotes/:id/reactions`.
//!
//! `POST` toggles the caller's reaction: body `{"reaction_type":"LIKE"}`.
//! Posting the kind already held removes it, any other kind replaces it.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use quoteshelf_catalog::Catalog;
use quoteshelf_core::{
  reaction::{Reaction, ReactionKind, ToggledReaction},
  store::LibraryStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_quote;
use crate::{AppState, auth::CurrentUser, error::ApiError};

#[derive(Debug, Serialize)]
pub struct ReactionCount {
  #[serde(rename = "type")]
  pub kind:  ReactionKind,
  pub emoji: &'static str,
  pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ReactionList {
  pub reactions: Vec<Reaction>,
  /// One entry per kind, in declaration order, zero counts included.
  pub counts:    Vec<ReactionCount>,
}

fn count_by_kind(reactions: &[Reaction]) -> Vec<ReactionCount> {
  ReactionKind::ALL
    .into_iter()
    .map(|kind| ReactionCount {
      kind,
      emoji: kind.emoji(),
      count: reactions.iter().filter(|r| r.kind == kind).count(),
    })
    .collect()
}

/// `GET /api/quotes/:id/reactions`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  Path(quote_id): Path<Uuid>,
) -> Result<Json<ReactionList>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  require_quote(state.store.as_ref(), quote_id).await?;
  let reactions = state
    .store
    .list_reactions(quote_id)
    .await
    .map_err(ApiError::store)?;
  let counts = count_by_kind(&reactions);
  Ok(Json(ReactionList { reactions, counts }))
}

#[derive(Debug, Deserialize)]
pub struct ToggleBody {
  pub reaction_type: String,
}

/// `POST /api/quotes/:id/reactions`
pub async fn toggle<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  Path(quote_id): Path<Uuid>,
  payload: Result<Json<ToggleBody>, JsonRejection>,
) -> Result<Json<ToggledReaction>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  let kind: ReactionKind = body
    .reaction_type
    .parse()
    .map_err(|_| ApiError::BadRequest("Invalid reaction type".into()))?;
  require_quote(state.store.as_ref(), quote_id).await?;

  let toggled = state
    .store
    .toggle_reaction(user.user_id, quote_id, kind)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(%quote_id, %kind, status = ?toggled.status, "toggled reaction");
  Ok(Json(toggled))
}

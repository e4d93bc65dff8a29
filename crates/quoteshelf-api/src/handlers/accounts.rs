//! Handlers for account and session endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `POST`   | `/signup`     | Body: `{"username","email","password"}` → 201 `{token, user}` |
//! | `POST`   | `/login`      | Body: `{"username","password"}` → `{token, user}` |
//! | `POST`   | `/logout`     | Revokes the presented token → 204 |
//! | `GET`    | `/user`       | `{user}` for the presented token |
//! | `GET`    | `/users`      | Admin only |
//! | `DELETE` | `/users/:id`  | Admin only; cascades everything the user owns |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use quoteshelf_catalog::Catalog;
use quoteshelf_core::{
  store::LibraryStore,
  user::{NewUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::{AdminUser, CurrentUser, generate_token, hash_password, hash_token, verify_password},
  error::ApiError,
};

pub const MAX_USERNAME_LEN: usize = 150;

/// Returned by signup and login. `token` is shown to the client only here.
#[derive(Debug, Serialize)]
pub struct Session {
  pub token: String,
  pub user:  User,
}

async fn issue_token<S: LibraryStore>(store: &S, user: User) -> Result<Session, ApiError> {
  let token = generate_token();
  store
    .store_token(user.user_id, hash_token(&token))
    .await
    .map_err(ApiError::store)?;
  Ok(Session { token, user })
}

// ─── Signup ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub username: String,
  pub email:    String,
  pub password: String,
}

impl SignupBody {
  fn validate(&self) -> Result<(), ApiError> {
    let username = self.username.trim();
    if username.is_empty() {
      return Err(ApiError::BadRequest("Username may not be blank".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
      return Err(ApiError::BadRequest(format!(
        "Username may not be longer than {MAX_USERNAME_LEN} characters"
      )));
    }
    if !self.email.contains('@') {
      return Err(ApiError::BadRequest("Enter a valid email address".into()));
    }
    if self.password.is_empty() {
      return Err(ApiError::BadRequest("Password may not be blank".into()));
    }
    Ok(())
  }
}

/// `POST /signup`
pub async fn signup<S, C>(
  State(state): State<AppState<S, C>>,
  payload: Result<Json<SignupBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  body.validate()?;

  let email = body.email.trim().to_string();
  if state.store.email_registered(&email).await.map_err(ApiError::store)? {
    return Err(ApiError::BadRequest("Email address is already registered".into()));
  }

  let password_hash =
    hash_password(&body.password).map_err(|e| ApiError::Store(e.to_string().into()))?;
  let user = state
    .store
    .create_user(NewUser {
      username: body.username.trim().to_string(),
      email,
      password_hash,
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::BadRequest("A user with that username already exists".into()))?;

  tracing::info!(user_id = %user.user_id, username = %user.username, "registered user");
  let session = issue_token(state.store.as_ref(), user).await?;
  Ok((StatusCode::CREATED, Json(session)))
}

// ─── Login / logout ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /login`: every successful login issues a fresh token.
pub async fn login<S, C>(
  State(state): State<AppState<S, C>>,
  payload: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<Session>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let Json(body) = payload?;
  let credentials = state
    .store
    .find_credentials(body.username.trim())
    .await
    .map_err(ApiError::store)?
    .filter(|c| verify_password(&body.password, &c.password_hash))
    .ok_or_else(|| ApiError::BadRequest("User not found".into()))?;

  let session = issue_token(state.store.as_ref(), credentials.user).await?;
  Ok(Json(session))
}

/// `POST /logout`
pub async fn logout<S, C>(
  State(state): State<AppState<S, C>>,
  current: CurrentUser,
) -> Result<StatusCode, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  state
    .store
    .revoke_token(&current.token_hash)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Current user ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
  pub user: User,
}

/// `GET /user`
pub async fn current(current: CurrentUser) -> Json<UserEnvelope> {
  Json(UserEnvelope { user: current.user })
}

// ─── Admin ────────────────────────────────────────────────────────────────────

/// The directory view of a user.
#[derive(Debug, Serialize)]
pub struct UserListing {
  pub id:       Uuid,
  pub username: String,
  pub email:    String,
}

/// `GET /users`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  _admin: AdminUser,
) -> Result<Json<Vec<UserListing>>, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  let users = state.store.list_users().await.map_err(ApiError::store)?;
  Ok(Json(
    users
      .into_iter()
      .map(|u| UserListing { id: u.user_id, username: u.username, email: u.email })
      .collect(),
  ))
}

/// `DELETE /users/:id`
pub async fn remove<S, C>(
  State(state): State<AppState<S, C>>,
  AdminUser(admin): AdminUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  if !state.store.delete_user(id).await.map_err(ApiError::store)? {
    return Err(ApiError::not_found("User"));
  }
  tracing::info!(user_id = %id, admin = %admin.username, "deleted user");
  Ok(StatusCode::NO_CONTENT)
}

//! Password hashing, bearer tokens, and the authenticated-user extractors.
//!
//! Tokens are opaque random strings handed to the client once; the store only
//! ever sees their SHA-256 digest.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use quoteshelf_catalog::Catalog;
use quoteshelf_core::{store::LibraryStore, user::User};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::{AppState, error::ApiError};

const TOKEN_BYTES: usize = 32;

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// `false` for a wrong password and for a malformed hash alike.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(password_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

/// The form in which a token is persisted.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  let value = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;
  let token = value
    .strip_prefix("Bearer ")
    .map(str::trim)
    .ok_or(ApiError::Unauthorized)?;
  if token.is_empty() {
    return Err(ApiError::Unauthorized);
  }
  Ok(token)
}

/// The user owning the presented bearer token.
pub struct CurrentUser {
  pub user:       User,
  pub token_hash: String,
}

/// A [`CurrentUser`] with admin rights.
pub struct AdminUser(pub User);

impl<S, C> FromRequestParts<AppState<S, C>> for CurrentUser
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, C>,
  ) -> Result<Self, Self::Rejection> {
    let token_hash = hash_token(bearer_token(&parts.headers)?);
    let user = state
      .store
      .user_for_token(&token_hash)
      .await
      .map_err(ApiError::store)?
      .ok_or(ApiError::Unauthorized)?;
    Ok(CurrentUser { user, token_hash })
  }
}

impl<S, C> FromRequestParts<AppState<S, C>> for AdminUser
where
  S: LibraryStore + 'static,
  C: Catalog + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, C>,
  ) -> Result<Self, Self::Rejection> {
    let CurrentUser { user, .. } = CurrentUser::from_request_parts(parts, state).await?;
    if !user.is_admin {
      return Err(ApiError::forbidden());
    }
    Ok(AdminUser(user))
  }
}

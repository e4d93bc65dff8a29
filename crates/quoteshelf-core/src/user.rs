//! Accounts and bearer-token sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. The password hash never leaves the store through
/// this type; see [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:     Uuid,
  pub username:    String,
  pub email:       String,
  pub is_admin:    bool,
  pub date_joined: DateTime<Utc>,
}

/// Input for [`LibraryStore::create_user`](crate::store::LibraryStore::create_user).
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// A user together with the stored password hash, used only at login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  pub password_hash: String,
}

//! Favorite books. A user can favorite a given book at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::book::Book;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
  pub favorite_id: Uuid,
  pub user_id:     Uuid,
  pub book_id:     Uuid,
  pub created_at:  DateTime<Utc>,
}

/// A favorite with its book resolved, as listed to the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteDetail {
  pub favorite_id: Uuid,
  pub user_id:     Uuid,
  pub book:        Book,
  pub created_at:  DateTime<Utc>,
}

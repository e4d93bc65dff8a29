//! Threaded comments on quotes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub user_id:    Uuid,
  pub quote_id:   Uuid,
  /// The comment this one replies to, always on the same quote.
  pub parent_id:  Option<Uuid>,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
  pub user_id:   Uuid,
  pub quote_id:  Uuid,
  pub parent_id: Option<Uuid>,
  pub content:   String,
}

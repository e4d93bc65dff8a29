//! Quotes: a passage from a book, recorded by a user, optionally tagged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{book::Book, comment::Comment, reaction::Reaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
  pub quote_id:   Uuid,
  pub user_id:    Uuid,
  pub book_id:    Uuid,
  pub text:       String,
  /// Chapter, page, or any other free-form context. Empty when not given.
  pub context:    String,
  /// Normalised tag names, sorted.
  pub tags:       Vec<String>,
  pub created_at: DateTime<Utc>,
}

/// Input for [`LibraryStore::create_quote`](crate::store::LibraryStore::create_quote).
///
/// `tags` must already be normalised (see
/// [`normalize_tag_names`](crate::tag::normalize_tag_names)).
#[derive(Debug, Clone)]
pub struct NewQuote {
  pub user_id: Uuid,
  pub book_id: Uuid,
  pub text:    String,
  pub context: String,
  pub tags:    Vec<String>,
}

/// Partial update of a quote. `None` leaves a field untouched; `Some(tags)`
/// replaces the whole tag set.
#[derive(Debug, Clone, Default)]
pub struct QuoteUpdate {
  pub text:    Option<String>,
  pub context: Option<String>,
  pub tags:    Option<Vec<String>>,
}

/// Parameters for [`LibraryStore::list_quotes`](crate::store::LibraryStore::list_quotes).
#[derive(Debug, Clone, Default)]
pub struct QuoteQuery {
  pub user_id: Option<Uuid>,
  pub book_id: Option<Uuid>,
  /// Normalised tag name the quote must carry.
  pub tag:     Option<String>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

/// A quote together with the book it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDetail {
  #[serde(flatten)]
  pub quote: Quote,
  pub book:  Book,
}

/// One entry of the global feed: never stored, always assembled on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
  #[serde(flatten)]
  pub quote:          Quote,
  pub book:           Book,
  pub reactions:      Vec<Reaction>,
  pub comments:       Vec<Comment>,
  pub reaction_count: usize,
}

//! Books materialised from the external catalog, and the lighter summary
//! shape returned by catalog searches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A locally persisted book. `external_id` is the catalog provider's volume
/// id and is unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
  pub book_id:     Uuid,
  pub external_id: String,
  pub title:       String,
  pub authors:     Vec<String>,
  pub description: String,
  pub cover_image: String,
  pub genres:      Vec<String>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Catalog data for a book that has not been persisted yet.
///
/// Fields the provider omits are empty, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
  pub external_id: String,
  pub title:       String,
  pub authors:     Vec<String>,
  pub description: String,
  pub cover_image: String,
  pub genres:      Vec<String>,
}

/// One row of a catalog search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
  pub external_id: String,
  pub title:       String,
  pub authors:     Vec<String>,
  pub genres:      Vec<String>,
  pub thumbnail:   Option<String>,
}

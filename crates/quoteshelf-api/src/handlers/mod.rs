//! Route handlers, one module per resource.

pub mod accounts;
pub mod books;
pub mod comments;
pub mod favorites;
pub mod quotes;
pub mod reactions;
pub mod tags;

use quoteshelf_core::{quote::Quote, store::LibraryStore};
use uuid::Uuid;

use crate::error::ApiError;

pub(crate) async fn require_quote<S: LibraryStore>(store: &S, id: Uuid) -> Result<Quote, ApiError> {
  store
    .get_quote(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Quote"))
}

//! Book catalog access for quoteshelf.
//!
//! [`GoogleBooksClient`] talks to the external provider, [`SearchCache`]
//! remembers recent search results, and [`BookService`] combines the two with
//! a [`LibraryStore`](quoteshelf_core::store::LibraryStore) to search the
//! catalog and materialize books locally.

pub mod cache;
pub mod client;
pub mod error;
pub mod service;

mod volume;

use std::future::Future;

use quoteshelf_core::book::{BookSummary, NewBook};

pub use cache::SearchCache;
pub use client::GoogleBooksClient;
pub use error::CatalogError;
pub use service::BookService;

/// An external book catalog.
pub trait Catalog: Send + Sync {
  /// Free-text search. Items the provider returns without an id are dropped.
  fn search_volumes<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<BookSummary>, CatalogError>> + Send + 'a;

  /// Full details for one volume.
  fn fetch_volume<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<NewBook, CatalogError>> + Send + 'a;
}

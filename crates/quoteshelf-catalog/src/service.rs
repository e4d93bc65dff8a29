//! Catalog search and book materialization.

use quoteshelf_core::{
  book::{Book, BookSummary},
  store::LibraryStore,
};

use crate::{Catalog, SearchCache};

/// Owns the catalog client and its search cache. Shared across requests
/// behind an `Arc`.
pub struct BookService<C> {
  catalog: C,
  cache:   SearchCache,
}

impl<C: Catalog> BookService<C> {
  pub fn new(catalog: C, cache: SearchCache) -> Self { Self { catalog, cache } }

  pub fn catalog(&self) -> &C { &self.catalog }

  pub fn cache(&self) -> &SearchCache { &self.cache }

  /// Search the catalog, consulting the cache first.
  ///
  /// Provider failures are logged and yield an empty list. Only non-empty
  /// successful results are cached.
  pub async fn search(&self, query: &str) -> Vec<BookSummary> {
    if query.trim().is_empty() {
      return Vec::new();
    }
    if let Some(books) = self.cache.get(query) {
      tracing::debug!(query, "search cache hit");
      return books;
    }

    match self.catalog.search_volumes(query).await {
      Ok(books) => {
        if !books.is_empty() {
          self.cache.insert(query, books.clone());
        }
        books
      }
      Err(e) => {
        tracing::warn!(query, error = %e, "catalog search failed");
        Vec::new()
      }
    }
  }

  /// Return the local book for `external_id`, creating it from catalog data
  /// on first reference.
  ///
  /// Returns `Ok(None)` when the catalog cannot supply the volume. If another
  /// request persists the same book first, its row is returned.
  pub async fn get_or_create<S: LibraryStore>(
    &self,
    store: &S,
    external_id: &str,
  ) -> Result<Option<Book>, S::Error> {
    if let Some(book) = store.get_book_by_external_id(external_id).await? {
      return Ok(Some(book));
    }

    let mut details = match self.catalog.fetch_volume(external_id).await {
      Ok(details) => details,
      Err(e) => {
        tracing::warn!(external_id, error = %e, "catalog lookup failed");
        return Ok(None);
      }
    };
    // The row is keyed on the id the caller asked for.
    details.external_id = external_id.to_string();

    match store.create_book(details).await? {
      Some(book) => {
        tracing::info!(external_id, book_id = %book.book_id, "materialized book");
        Ok(Some(book))
      }
      None => store.get_book_by_external_id(external_id).await,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
  };

  use quoteshelf_core::book::NewBook;
  use quoteshelf_store_sqlite::SqliteStore;
  use reqwest::StatusCode;

  use super::*;
  use crate::CatalogError;

  /// A catalog that counts calls and can be switched to fail.
  #[derive(Default)]
  struct CountingCatalog {
    searches: AtomicUsize,
    fetches:  AtomicUsize,
    fail:     bool,
    empty:    bool,
  }

  impl CountingCatalog {
    fn failing() -> Self { Self { fail: true, ..Self::default() } }

    fn searches(&self) -> usize { self.searches.load(Ordering::SeqCst) }

    fn fetches(&self) -> usize { self.fetches.load(Ordering::SeqCst) }
  }

  impl Catalog for CountingCatalog {
    async fn search_volumes(&self, query: &str) -> Result<Vec<BookSummary>, CatalogError> {
      self.searches.fetch_add(1, Ordering::SeqCst);
      if self.fail {
        return Err(CatalogError::Status(StatusCode::INTERNAL_SERVER_ERROR));
      }
      if self.empty {
        return Ok(Vec::new());
      }
      Ok(vec![BookSummary {
        external_id: format!("{query}-1"),
        title:       query.to_uppercase(),
        authors:     vec!["Anon".into()],
        genres:      vec![],
        thumbnail:   None,
      }])
    }

    async fn fetch_volume(&self, external_id: &str) -> Result<NewBook, CatalogError> {
      self.fetches.fetch_add(1, Ordering::SeqCst);
      if self.fail {
        return Err(CatalogError::Status(StatusCode::NOT_FOUND));
      }
      Ok(NewBook {
        external_id: external_id.into(),
        title: "Walden".into(),
        authors: vec!["Henry David Thoreau".into()],
        ..NewBook::default()
      })
    }
  }

  /// Persists a competing row for the id while "fetching", so the
  /// subsequent insert loses the race.
  struct RacingCatalog {
    store: SqliteStore,
  }

  impl Catalog for RacingCatalog {
    async fn search_volumes(&self, _: &str) -> Result<Vec<BookSummary>, CatalogError> {
      Ok(Vec::new())
    }

    async fn fetch_volume(&self, external_id: &str) -> Result<NewBook, CatalogError> {
      let winner = NewBook {
        external_id: external_id.into(),
        title: "Winner".into(),
        ..NewBook::default()
      };
      self.store.create_book(winner).await.unwrap().unwrap();
      Ok(NewBook {
        external_id: external_id.into(),
        title: "Loser".into(),
        ..NewBook::default()
      })
    }
  }

  fn service(catalog: CountingCatalog) -> BookService<CountingCatalog> {
    BookService::new(catalog, SearchCache::default())
  }

  // ─── search ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn repeated_search_is_served_from_cache() {
    let svc = service(CountingCatalog::default());
    let first = svc.search("walden").await;
    let second = svc.search("walden").await;
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert_eq!(svc.catalog().searches(), 1);

    svc.search("dune").await;
    assert_eq!(svc.catalog().searches(), 2);
  }

  #[tokio::test]
  async fn failed_search_is_empty_and_not_cached() {
    let svc = service(CountingCatalog::failing());
    assert!(svc.search("walden").await.is_empty());
    assert!(svc.search("walden").await.is_empty());
    assert_eq!(svc.catalog().searches(), 2);
    assert!(svc.cache().is_empty());
  }

  #[tokio::test]
  async fn empty_result_is_not_cached() {
    let svc = service(CountingCatalog { empty: true, ..CountingCatalog::default() });
    assert!(svc.search("zzz").await.is_empty());
    assert!(svc.cache().is_empty());
  }

  #[tokio::test]
  async fn blank_query_skips_catalog() {
    let svc = service(CountingCatalog::default());
    assert!(svc.search("   ").await.is_empty());
    assert_eq!(svc.catalog().searches(), 0);
  }

  #[tokio::test]
  async fn expired_entry_triggers_new_call() {
    let svc = BookService::new(
      CountingCatalog::default(),
      SearchCache::new(Duration::from_millis(20)),
    );
    svc.search("walden").await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    svc.search("walden").await;
    assert_eq!(svc.catalog().searches(), 2);
  }

  // ─── get_or_create ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_or_create_twice_returns_same_record() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let svc = service(CountingCatalog::default());

    let first = svc.get_or_create(&store, "walden-1").await.unwrap().unwrap();
    let second = svc.get_or_create(&store, "walden-1").await.unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.title, "Walden");
    assert!(first.description.is_empty());
    assert_eq!(svc.catalog().fetches(), 1);
  }

  #[tokio::test]
  async fn get_or_create_unknown_volume_is_none() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let svc = service(CountingCatalog::failing());

    assert!(svc.get_or_create(&store, "ghost").await.unwrap().is_none());
    assert!(store.list_books().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn get_or_create_returns_winner_after_lost_race() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let svc = BookService::new(
      RacingCatalog { store: store.clone() },
      SearchCache::default(),
    );

    let book = svc.get_or_create(&store, "contested").await.unwrap().unwrap();
    assert_eq!(book.title, "Winner");
    assert_eq!(store.list_books().await.unwrap().len(), 1);
  }
}

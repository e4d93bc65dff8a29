//! Time-boxed memory of catalog search results.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use quoteshelf_core::book::BookSummary;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
  books:      Vec<BookSummary>,
  expires_at: Instant,
}

/// Search results keyed by the literal query string.
///
/// Unbounded. Expired entries are dropped when next looked up. Concurrent
/// writers for the same key race and the last one wins.
pub struct SearchCache {
  entries: DashMap<String, CacheEntry>,
  ttl:     Duration,
}

impl SearchCache {
  pub fn new(ttl: Duration) -> Self {
    Self { entries: DashMap::new(), ttl }
  }

  /// The cached results for `query`, if present and not yet expired.
  pub fn get(&self, query: &str) -> Option<Vec<BookSummary>> {
    let now = Instant::now();
    if let Some(entry) = self.entries.get(query)
      && entry.expires_at > now
    {
      return Some(entry.books.clone());
    }
    self.entries.remove_if(query, |_, entry| entry.expires_at <= now);
    None
  }

  pub fn insert(&self, query: impl Into<String>, books: Vec<BookSummary>) {
    let expires_at = Instant::now() + self.ttl;
    self.entries.insert(query.into(), CacheEntry { books, expires_at });
  }

  /// Number of stored entries, including expired ones not yet evicted.
  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl Default for SearchCache {
  fn default() -> Self { Self::new(DEFAULT_TTL) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn summary(id: &str) -> BookSummary {
    BookSummary {
      external_id: id.into(),
      title:       format!("Title {id}"),
      authors:     vec![],
      genres:      vec![],
      thumbnail:   None,
    }
  }

  #[test]
  fn hit_returns_stored_list() {
    let cache = SearchCache::default();
    cache.insert("dune", vec![summary("a"), summary("b")]);
    let hit = cache.get("dune").unwrap();
    assert_eq!(hit, [summary("a"), summary("b")]);
  }

  #[test]
  fn keys_are_literal() {
    let cache = SearchCache::default();
    cache.insert("Dune", vec![summary("a")]);
    assert!(cache.get("dune").is_none());
    assert!(cache.get("Dune ").is_none());
  }

  #[test]
  fn expired_entries_are_evicted_on_lookup() {
    let cache = SearchCache::new(Duration::ZERO);
    cache.insert("dune", vec![summary("a")]);
    assert_eq!(cache.len(), 1);
    assert!(cache.get("dune").is_none());
    assert!(cache.is_empty());
  }

  #[test]
  fn later_insert_overwrites() {
    let cache = SearchCache::default();
    cache.insert("dune", vec![summary("a")]);
    cache.insert("dune", vec![summary("b")]);
    assert_eq!(cache.get("dune").unwrap(), [summary("b")]);
  }
}

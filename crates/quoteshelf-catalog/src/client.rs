//! Async HTTP client for the Google Books `volumes` API.

use std::time::Duration;

use quoteshelf_core::book::{BookSummary, NewBook};
use reqwest::{Client, Url};

use crate::{
  Catalog, CatalogError,
  volume::{Volume, VolumeList},
};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Connection settings for the catalog provider.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url:    String,
  pub api_key:     Option<String>,
  pub max_results: u32,
  pub timeout:     Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url:    DEFAULT_BASE_URL.to_string(),
      api_key:     None,
      max_results: 20,
      timeout:     Duration::from_secs(10),
    }
  }
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GoogleBooksClient {
  client:      Client,
  base:        Url,
  api_key:     Option<String>,
  max_results: u32,
}

impl GoogleBooksClient {
  pub fn new(config: ClientConfig) -> Result<Self, CatalogError> {
    let base = Url::parse(&config.base_url)
      .map_err(|e| CatalogError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
    if base.cannot_be_a_base() {
      return Err(CatalogError::InvalidUrl(config.base_url));
    }
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self {
      client,
      base,
      api_key: config.api_key,
      max_results: config.max_results,
    })
  }

  fn volume_url(&self, external_id: &str) -> Result<Url, CatalogError> {
    let mut url = self.base.clone();
    url
      .path_segments_mut()
      .map_err(|_| CatalogError::InvalidUrl(self.base.to_string()))?
      .pop_if_empty()
      .push(external_id);
    Ok(url)
  }

  fn key_param(&self) -> Vec<(&'static str, String)> {
    self
      .api_key
      .iter()
      .map(|key| ("key", key.clone()))
      .collect()
  }
}

impl Catalog for GoogleBooksClient {
  /// `GET {base}?q=<query>&maxResults=<n>[&key=<key>]`
  async fn search_volumes(&self, query: &str) -> Result<Vec<BookSummary>, CatalogError> {
    let mut params = vec![
      ("q", query.to_string()),
      ("maxResults", self.max_results.to_string()),
    ];
    params.extend(self.key_param());

    let resp = self
      .client
      .get(self.base.clone())
      .query(&params)
      .send()
      .await?;
    if !resp.status().is_success() {
      return Err(CatalogError::Status(resp.status()));
    }
    let list: VolumeList = resp.json().await?;
    Ok(list.into_summaries())
  }

  /// `GET {base}/<id>[?key=<key>]`
  async fn fetch_volume(&self, external_id: &str) -> Result<NewBook, CatalogError> {
    let resp = self
      .client
      .get(self.volume_url(external_id)?)
      .query(&self.key_param())
      .send()
      .await?;
    if !resp.status().is_success() {
      return Err(CatalogError::Status(resp.status()));
    }
    let mut volume: Volume = resp.json().await?;
    if volume.id.is_empty() {
      volume.id = external_id.to_string();
    }
    Ok(volume.into_new_book())
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
  };
  use serde_json::json;
  use tokio::net::TcpListener;

  use super::*;

  async fn search(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let q = params.get("q").cloned().unwrap_or_default();
    if q == "nothing" {
      return Json(json!({ "kind": "books#volumes", "totalItems": 0 }));
    }
    Json(json!({
      "items": [
        {
          "id": "dune-1",
          "volumeInfo": {
            "title": format!("Dune ({q})"),
            "authors": ["Frank Herbert"],
            "categories": ["Fiction"],
            "imageLinks": { "thumbnail": "http://img.example/dune.jpg" }
          }
        },
        { "volumeInfo": { "title": "No id" } },
        {
          "id": "key-echo",
          "volumeInfo": {
            "title": params.get("key").cloned().unwrap_or_default(),
            "description": params.get("maxResults").cloned().unwrap_or_default()
          }
        }
      ]
    }))
  }

  async fn volume(Path(id): Path<String>) -> impl IntoResponse {
    if id != "dune-1" {
      return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })));
    }
    (
      StatusCode::OK,
      Json(json!({
        "id": "dune-1",
        "volumeInfo": {
          "title": "Dune",
          "authors": ["Frank Herbert"],
          "description": "Spice.",
          "imageLinks": { "thumbnail": "http://img.example/dune.jpg" }
        }
      })),
    )
  }

  /// Serve a fake provider on an ephemeral port; returns its base URL.
  async fn provider() -> String {
    let app = Router::new()
      .route("/ok/volumes", get(search))
      .route("/ok/volumes/{id}", get(volume))
      .route("/down/volumes", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
  }

  fn client(base_url: String, api_key: Option<&str>) -> GoogleBooksClient {
    GoogleBooksClient::new(ClientConfig {
      base_url,
      api_key: api_key.map(str::to_owned),
      max_results: 7,
      timeout: Duration::from_secs(5),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn search_maps_items_and_sends_params() {
    let base = provider().await;
    let c = client(format!("{base}/ok/volumes"), Some("secret"));

    let books = c.search_volumes("dune").await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].external_id, "dune-1");
    assert_eq!(books[0].title, "Dune (dune)");
    assert_eq!(books[0].authors, ["Frank Herbert"]);
    assert_eq!(books[0].thumbnail.as_deref(), Some("http://img.example/dune.jpg"));
    assert_eq!(books[1].title, "secret");
    assert_eq!(books[1].thumbnail, None);
  }

  #[tokio::test]
  async fn search_without_items_is_empty() {
    let base = provider().await;
    let c = client(format!("{base}/ok/volumes"), None);
    assert!(c.search_volumes("nothing").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn server_error_is_reported() {
    let base = provider().await;
    let c = client(format!("{base}/down/volumes"), None);
    let err = c.search_volumes("dune").await.unwrap_err();
    assert!(matches!(err, CatalogError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
  }

  #[tokio::test]
  async fn fetch_volume_builds_new_book() {
    let base = provider().await;
    let c = client(format!("{base}/ok/volumes"), None);

    let book = c.fetch_volume("dune-1").await.unwrap();
    assert_eq!(book.external_id, "dune-1");
    assert_eq!(book.title, "Dune");
    assert_eq!(book.description, "Spice.");
    assert_eq!(book.cover_image, "http://img.example/dune.jpg");
    assert!(book.genres.is_empty());

    let missing = c.fetch_volume("nope").await.unwrap_err();
    assert!(matches!(missing, CatalogError::Status(s) if s == StatusCode::NOT_FOUND));
  }

  #[test]
  fn volume_url_escapes_the_id() {
    let c = client("https://books.example/v1/volumes/".into(), None);
    let url = c.volume_url("a b/c").unwrap();
    assert_eq!(url.as_str(), "https://books.example/v1/volumes/a%20b%2Fc");
  }

  #[test]
  fn rejects_unparseable_base_url() {
    let err = GoogleBooksClient::new(ClientConfig {
      base_url: "not a url".into(),
      ..ClientConfig::default()
    });
    assert!(matches!(err, Err(CatalogError::InvalidUrl(_))));
  }
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("catalog request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("catalog responded with {0}")]
  Status(StatusCode),

  #[error("invalid catalog URL: {0}")]
  InvalidUrl(String),
}

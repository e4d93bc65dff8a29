//! Error types for `quoteshelf-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown reaction kind: {0:?}")]
  UnknownReactionKind(String),

  #[error("tag name is empty")]
  EmptyTagName,

  #[error("tag name {0:?} is longer than {max} characters", max = crate::tag::MAX_TAG_LEN)]
  TagNameTooLong(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

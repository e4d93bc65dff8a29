//! Tags attached to quotes. A tag is identified by its normalised name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Longest accepted tag name, in characters, after normalisation.
pub const MAX_TAG_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
  pub tag_id: Uuid,
  pub name:   String,
  pub slug:   String,
}

/// Trim and lowercase a tag name.
pub fn normalize_tag_name(raw: &str) -> Result<String> {
  let name = raw.trim().to_lowercase();
  if name.is_empty() {
    return Err(Error::EmptyTagName);
  }
  if name.chars().count() > MAX_TAG_LEN {
    return Err(Error::TagNameTooLong(name));
  }
  Ok(name)
}

/// Normalise a list of raw tag names, dropping blanks and collapsing
/// duplicates while keeping first-seen order.
pub fn normalize_tag_names<I, S>(raw: I) -> Result<Vec<String>>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut names: Vec<String> = Vec::new();
  for r in raw {
    let name = match normalize_tag_name(r.as_ref()) {
      Ok(n) => n,
      Err(Error::EmptyTagName) => continue,
      Err(e) => return Err(e),
    };
    if !names.contains(&name) {
      names.push(name);
    }
  }
  Ok(names)
}

/// URL-friendly form of a tag name: Unicode alphanumerics kept, runs of
/// anything else collapsed to a single `-`.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut pending_dash = false;
  for c in name.chars() {
    if c.is_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.extend(c.to_lowercase());
    } else {
      pending_dash = true;
    }
  }
  slug
}

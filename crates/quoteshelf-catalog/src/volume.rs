//! Wire shapes of the Google Books `volumes` resource.
//!
//! Every field is optional on the wire; absent fields decode to empty values.

use quoteshelf_core::book::{BookSummary, NewBook};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct VolumeList {
  pub items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Volume {
  pub id:          String,
  pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct VolumeInfo {
  pub title:       String,
  pub authors:     Vec<String>,
  pub categories:  Vec<String>,
  pub description: String,
  pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ImageLinks {
  pub thumbnail: Option<String>,
}

impl VolumeInfo {
  fn thumbnail(&self) -> Option<&str> {
    self.image_links.as_ref()?.thumbnail.as_deref()
  }
}

impl VolumeList {
  /// Search results in provider order, minus items without an id.
  pub fn into_summaries(self) -> Vec<BookSummary> {
    self
      .items
      .into_iter()
      .filter(|v| !v.id.is_empty())
      .map(Volume::into_summary)
      .collect()
  }
}

impl Volume {
  pub fn into_summary(self) -> BookSummary {
    let thumbnail = self.volume_info.thumbnail().map(str::to_owned);
    BookSummary {
      external_id: self.id,
      title: self.volume_info.title,
      authors: self.volume_info.authors,
      genres: self.volume_info.categories,
      thumbnail,
    }
  }

  pub fn into_new_book(self) -> NewBook {
    let cover_image = self.volume_info.thumbnail().unwrap_or_default().to_owned();
    NewBook {
      external_id: self.id,
      title: self.volume_info.title,
      authors: self.volume_info.authors,
      description: self.volume_info.description,
      cover_image,
      genres: self.volume_info.categories,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_fields_default_to_empty() {
    let v: Volume = serde_json::from_str(r#"{"id":"x1"}"#).unwrap();
    let book = v.into_new_book();
    assert_eq!(book.external_id, "x1");
    assert!(book.title.is_empty());
    assert!(book.authors.is_empty());
    assert!(book.cover_image.is_empty());
  }

  #[test]
  fn items_without_id_are_skipped() {
    let list: VolumeList = serde_json::from_str(
      r#"{"items":[
        {"id":"a","volumeInfo":{"title":"Dune","categories":["Fiction"],
          "imageLinks":{"thumbnail":"http://img/a.jpg"}}},
        {"volumeInfo":{"title":"Ghost"}}
      ]}"#,
    )
    .unwrap();
    let summaries = list.into_summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].title, "Dune");
    assert_eq!(summaries[0].genres, ["Fiction"]);
    assert_eq!(summaries[0].thumbnail.as_deref(), Some("http://img/a.jpg"));
  }

  #[test]
  fn response_without_items_is_empty() {
    let list: VolumeList =
      serde_json::from_str(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap();
    assert!(list.into_summaries().is_empty());
  }
}

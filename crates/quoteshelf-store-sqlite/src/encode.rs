//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings with fixed microsecond
//! precision, so they sort lexically. String lists (authors, genres) are
//! stored as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use quoteshelf_core::{
  book::Book,
  comment::Comment,
  favorite::{Favorite, FavoriteDetail},
  quote::Quote,
  reaction::{Reaction, ReactionKind},
  tag::Tag,
  user::User,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Paging ───────────────────────────────────────────────────────────────────

/// `LIMIT`/`OFFSET` operand. Saturates instead of wrapping negative, which
/// SQLite would read as "no limit".
pub fn encode_count(n: usize) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time, truncated to the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── String lists ─────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── ReactionKind ─────────────────────────────────────────────────────────────

pub fn decode_reaction_kind(s: &str) -> Result<ReactionKind> { Ok(s.parse()?) }

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `Raw*` type holds the strings read from one row. `from_row` reads the
// columns starting at `at`, in the order of the matching `*_COLUMNS` list, so
// the same reader serves plain selects and joins.

pub const USER_COLUMNS: &str = "u.user_id, u.username, u.email, u.is_admin, u.date_joined";

pub struct RawUser {
  pub user_id:     String,
  pub username:    String,
  pub email:       String,
  pub is_admin:    bool,
  pub date_joined: String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:     row.get(at)?,
      username:    row.get(at + 1)?,
      email:       row.get(at + 2)?,
      is_admin:    row.get(at + 3)?,
      date_joined: row.get(at + 4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:     decode_uuid(&self.user_id)?,
      username:    self.username,
      email:       self.email,
      is_admin:    self.is_admin,
      date_joined: decode_dt(&self.date_joined)?,
    })
  }
}

pub const BOOK_COLUMNS: &str = "b.book_id, b.external_id, b.title, b.authors, \
   b.description, b.cover_image, b.genres, b.created_at, b.updated_at";

pub struct RawBook {
  pub book_id:     String,
  pub external_id: String,
  pub title:       String,
  pub authors:     String,
  pub description: String,
  pub cover_image: String,
  pub genres:      String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawBook {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      book_id:     row.get(at)?,
      external_id: row.get(at + 1)?,
      title:       row.get(at + 2)?,
      authors:     row.get(at + 3)?,
      description: row.get(at + 4)?,
      cover_image: row.get(at + 5)?,
      genres:      row.get(at + 6)?,
      created_at:  row.get(at + 7)?,
      updated_at:  row.get(at + 8)?,
    })
  }

  pub fn into_book(self) -> Result<Book> {
    Ok(Book {
      book_id:     decode_uuid(&self.book_id)?,
      external_id: self.external_id,
      title:       self.title,
      authors:     decode_list(&self.authors)?,
      description: self.description,
      cover_image: self.cover_image,
      genres:      decode_list(&self.genres)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

pub const TAG_COLUMNS: &str = "t.tag_id, t.name, t.slug";

pub struct RawTag {
  pub tag_id: String,
  pub name:   String,
  pub slug:   String,
}

impl RawTag {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      tag_id: row.get(at)?,
      name:   row.get(at + 1)?,
      slug:   row.get(at + 2)?,
    })
  }

  pub fn into_tag(self) -> Result<Tag> {
    Ok(Tag {
      tag_id: decode_uuid(&self.tag_id)?,
      name:   self.name,
      slug:   self.slug,
    })
  }
}

pub const QUOTE_COLUMNS: &str =
  "q.quote_id, q.user_id, q.book_id, q.text, q.context, q.created_at";

/// A `quotes` row plus the names of its tags, loaded separately.
pub struct RawQuote {
  pub quote_id:   String,
  pub user_id:    String,
  pub book_id:    String,
  pub text:       String,
  pub context:    String,
  pub created_at: String,
  pub tags:       Vec<String>,
}

impl RawQuote {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      quote_id:   row.get(at)?,
      user_id:    row.get(at + 1)?,
      book_id:    row.get(at + 2)?,
      text:       row.get(at + 3)?,
      context:    row.get(at + 4)?,
      created_at: row.get(at + 5)?,
      tags:       Vec::new(),
    })
  }

  pub fn into_quote(self) -> Result<Quote> {
    Ok(Quote {
      quote_id:   decode_uuid(&self.quote_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      book_id:    decode_uuid(&self.book_id)?,
      text:       self.text,
      context:    self.context,
      tags:       self.tags,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const REACTION_COLUMNS: &str =
  "r.reaction_id, r.user_id, r.quote_id, r.kind, r.created_at";

pub struct RawReaction {
  pub reaction_id: String,
  pub user_id:     String,
  pub quote_id:    String,
  pub kind:        String,
  pub created_at:  String,
}

impl RawReaction {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      reaction_id: row.get(at)?,
      user_id:     row.get(at + 1)?,
      quote_id:    row.get(at + 2)?,
      kind:        row.get(at + 3)?,
      created_at:  row.get(at + 4)?,
    })
  }

  pub fn into_reaction(self) -> Result<Reaction> {
    Ok(Reaction {
      reaction_id: decode_uuid(&self.reaction_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      quote_id:    decode_uuid(&self.quote_id)?,
      kind:        decode_reaction_kind(&self.kind)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const COMMENT_COLUMNS: &str = "c.comment_id, c.user_id, c.quote_id, \
   c.parent_id, c.content, c.created_at, c.updated_at";

pub struct RawComment {
  pub comment_id: String,
  pub user_id:    String,
  pub quote_id:   String,
  pub parent_id:  Option<String>,
  pub content:    String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawComment {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(at)?,
      user_id:    row.get(at + 1)?,
      quote_id:   row.get(at + 2)?,
      parent_id:  row.get(at + 3)?,
      content:    row.get(at + 4)?,
      created_at: row.get(at + 5)?,
      updated_at: row.get(at + 6)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      quote_id:   decode_uuid(&self.quote_id)?,
      parent_id:  self.parent_id.as_deref().map(decode_uuid).transpose()?,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const FAVORITE_COLUMNS: &str =
  "f.favorite_id, f.user_id, f.book_id, f.created_at";

pub struct RawFavorite {
  pub favorite_id: String,
  pub user_id:     String,
  pub book_id:     String,
  pub created_at:  String,
}

impl RawFavorite {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      favorite_id: row.get(at)?,
      user_id:     row.get(at + 1)?,
      book_id:     row.get(at + 2)?,
      created_at:  row.get(at + 3)?,
    })
  }

  pub fn into_favorite(self) -> Result<Favorite> {
    Ok(Favorite {
      favorite_id: decode_uuid(&self.favorite_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      book_id:     decode_uuid(&self.book_id)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }

  pub fn into_detail(self, book: RawBook) -> Result<FavoriteDetail> {
    let favorite = self.into_favorite()?;
    Ok(FavoriteDetail {
      favorite_id: favorite.favorite_id,
      user_id:     favorite.user_id,
      book:        book.into_book()?,
      created_at:  favorite.created_at,
    })
  }
}

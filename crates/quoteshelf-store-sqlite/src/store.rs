//! [`SqliteStore`]: the SQLite implementation of [`LibraryStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use quoteshelf_core::{
  book::{Book, NewBook},
  comment::{Comment, NewComment},
  favorite::{Favorite, FavoriteDetail},
  quote::{FeedEntry, NewQuote, Quote, QuoteQuery, QuoteUpdate},
  reaction::{Reaction, ReactionKind, ToggleOutcome, ToggledReaction, plan_toggle},
  store::LibraryStore,
  tag::{Tag, slugify},
  user::{NewUser, User, UserCredentials},
};

use crate::{
  Result,
  encode::{
    BOOK_COLUMNS, COMMENT_COLUMNS, FAVORITE_COLUMNS, QUOTE_COLUMNS,
    REACTION_COLUMNS, RawBook, RawComment, RawFavorite, RawQuote, RawReaction,
    RawTag, RawUser, TAG_COLUMNS, USER_COLUMNS, encode_count, encode_dt,
    encode_list, encode_uuid, now,
  },
  schema::SCHEMA,
};

const DEFAULT_LIST_LIMIT: usize = 100;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A quoteshelf store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Synchronous helpers (run inside `Connection::call`) ─────────────────────

fn query_quote_tags(conn: &Connection, quote_id: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare_cached(
    "SELECT t.name FROM quote_tags qt
     JOIN tags t ON t.tag_id = qt.tag_id
     WHERE qt.quote_id = ?1
     ORDER BY t.name",
  )?;
  stmt
    .query_map(params![quote_id], |row| row.get(0))?
    .collect()
}

fn query_quote(conn: &Connection, quote_id: &str) -> rusqlite::Result<Option<RawQuote>> {
  let raw = conn
    .query_row(
      &format!("SELECT {QUOTE_COLUMNS} FROM quotes q WHERE q.quote_id = ?1"),
      params![quote_id],
      |row| RawQuote::from_row(row, 0),
    )
    .optional()?;

  match raw {
    Some(mut q) => {
      q.tags = query_quote_tags(conn, &q.quote_id)?;
      Ok(Some(q))
    }
    None => Ok(None),
  }
}

/// Return the id of the tag named `name`, creating the tag if needed.
fn ensure_tag(conn: &Connection, name: &str) -> rusqlite::Result<String> {
  conn.execute(
    "INSERT INTO tags (tag_id, name, slug) VALUES (?1, ?2, ?3)
     ON CONFLICT (name) DO NOTHING",
    params![encode_uuid(Uuid::new_v4()), name, slugify(name)],
  )?;
  conn.query_row(
    "SELECT tag_id FROM tags WHERE name = ?1",
    params![name],
    |row| row.get(0),
  )
}

fn attach_tags(conn: &Connection, quote_id: &str, names: &[String]) -> rusqlite::Result<()> {
  for name in names {
    let tag_id = ensure_tag(conn, name)?;
    conn.execute(
      "INSERT INTO quote_tags (quote_id, tag_id) VALUES (?1, ?2)
       ON CONFLICT DO NOTHING",
      params![quote_id, tag_id],
    )?;
  }
  Ok(())
}

fn query_reactions(conn: &Connection, quote_id: &str) -> rusqlite::Result<Vec<RawReaction>> {
  let mut stmt = conn.prepare_cached(&format!(
    "SELECT {REACTION_COLUMNS} FROM reactions r
     WHERE r.quote_id = ?1
     ORDER BY r.created_at, r.rowid"
  ))?;
  stmt
    .query_map(params![quote_id], |row| RawReaction::from_row(row, 0))?
    .collect()
}

fn query_comments(conn: &Connection, quote_id: &str) -> rusqlite::Result<Vec<RawComment>> {
  let mut stmt = conn.prepare_cached(&format!(
    "SELECT {COMMENT_COLUMNS} FROM comments c
     WHERE c.quote_id = ?1
     ORDER BY c.created_at, c.rowid"
  ))?;
  stmt
    .query_map(params![quote_id], |row| RawComment::from_row(row, 0))?
    .collect()
}

fn query_comment(conn: &Connection, comment_id: &str) -> rusqlite::Result<Option<RawComment>> {
  conn
    .query_row(
      &format!("SELECT {COMMENT_COLUMNS} FROM comments c WHERE c.comment_id = ?1"),
      params![comment_id],
      |row| RawComment::from_row(row, 0),
    )
    .optional()
}

/// Raw strings for one feed entry, decoded after leaving the DB thread.
struct RawFeedEntry {
  quote:     RawQuote,
  book:      RawBook,
  reactions: Vec<RawReaction>,
  comments:  Vec<RawComment>,
}

impl RawFeedEntry {
  fn into_entry(self) -> Result<FeedEntry> {
    let reactions = self
      .reactions
      .into_iter()
      .map(RawReaction::into_reaction)
      .collect::<Result<Vec<_>>>()?;
    let comments = self
      .comments
      .into_iter()
      .map(RawComment::into_comment)
      .collect::<Result<Vec<_>>>()?;

    Ok(FeedEntry {
      quote: self.quote.into_quote()?,
      book: self.book.into_book()?,
      reaction_count: reactions.len(),
      reactions,
      comments,
    })
  }
}

// ─── LibraryStore impl ───────────────────────────────────────────────────────

impl LibraryStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User {
      user_id:     Uuid::new_v4(),
      username:    input.username,
      email:       input.email,
      is_admin:    false,
      date_joined: now(),
    };

    let id_str        = encode_uuid(user.user_id);
    let username      = user.username.clone();
    let email         = user.email.clone();
    let joined_str    = encode_dt(user.date_joined);
    let password_hash = input.password_hash;

    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT INTO users (user_id, username, email, password_hash, is_admin, date_joined)
           VALUES (?1, ?2, ?3, ?4, 0, ?5)
           ON CONFLICT DO NOTHING",
          params![id_str, username, email, password_hash, joined_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(inserted.then_some(user))
  }

  async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
    let username = username.to_owned();

    let raw: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_COLUMNS}, u.password_hash FROM users u WHERE u.username = ?1"
            ),
            params![username],
            |row| Ok((RawUser::from_row(row, 0)?, row.get(5)?)),
          )
          .optional()?)
      })
      .await?;

    match raw {
      Some((user, password_hash)) => Ok(Some(UserCredentials {
        user: user.into_user()?,
        password_hash,
      })),
      None => Ok(None),
    }
  }

  async fn email_registered(&self, email: &str) -> Result<bool> {
    let email = email.to_owned();

    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(found)
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users u ORDER BY u.date_joined, u.rowid"
        ))?;
        let rows = stmt
          .query_map([], |row| RawUser::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn set_admin(&self, username: &str, is_admin: bool) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET is_admin = ?1 WHERE username = ?2",
          params![is_admin, username],
        )?;
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users u WHERE u.username = ?1"),
            params![username],
            |row| RawUser::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_user(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM users WHERE user_id = ?1", params![id_str])?)
      })
      .await?;
    Ok(n > 0)
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn store_token(&self, user_id: Uuid, token_hash: String) -> Result<()> {
    let user_str = encode_uuid(user_id);
    let at_str   = encode_dt(now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES (?1, ?2, ?3)",
          params![token_hash, user_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn user_for_token(&self, token_hash: &str) -> Result<Option<User>> {
    let token_hash = token_hash.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_COLUMNS} FROM auth_tokens a
               JOIN users u ON u.user_id = a.user_id
               WHERE a.token_hash = ?1"
            ),
            params![token_hash],
            |row| RawUser::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn revoke_token(&self, token_hash: &str) -> Result<bool> {
    let token_hash = token_hash.to_owned();
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM auth_tokens WHERE token_hash = ?1",
          params![token_hash],
        )?)
      })
      .await?;
    Ok(n > 0)
  }

  // ── Books ─────────────────────────────────────────────────────────────────

  async fn get_book(&self, id: Uuid) -> Result<Option<Book>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.book_id = ?1"),
            params![id_str],
            |row| RawBook::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn get_book_by_external_id(&self, external_id: &str) -> Result<Option<Book>> {
    let external_id = external_id.to_owned();

    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.external_id = ?1"),
            params![external_id],
            |row| RawBook::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn create_book(&self, input: NewBook) -> Result<Option<Book>> {
    let created_at = now();
    let book = Book {
      book_id:     Uuid::new_v4(),
      external_id: input.external_id,
      title:       input.title,
      authors:     input.authors,
      description: input.description,
      cover_image: input.cover_image,
      genres:      input.genres,
      created_at,
      updated_at:  created_at,
    };

    let id_str      = encode_uuid(book.book_id);
    let external_id = book.external_id.clone();
    let title       = book.title.clone();
    let authors     = encode_list(&book.authors)?;
    let description = book.description.clone();
    let cover_image = book.cover_image.clone();
    let genres      = encode_list(&book.genres)?;
    let at_str      = encode_dt(created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT INTO books (
             book_id, external_id, title, authors, description,
             cover_image, genres, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
           ON CONFLICT (external_id) DO NOTHING",
          params![
            id_str,
            external_id,
            title,
            authors,
            description,
            cover_image,
            genres,
            at_str,
          ],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !inserted {
      tracing::debug!(external_id = %book.external_id, "book insert lost a uniqueness race");
    }
    Ok(inserted.then_some(book))
  }

  async fn list_books(&self) -> Result<Vec<Book>> {
    let raws: Vec<RawBook> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {BOOK_COLUMNS} FROM books b ORDER BY b.created_at DESC, b.rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], |row| RawBook::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBook::into_book).collect()
  }

  // ── Tags ──────────────────────────────────────────────────────────────────

  async fn get_or_create_tag(&self, name: String) -> Result<Tag> {
    let raw: RawTag = self
      .conn
      .call(move |conn| {
        let tag_id = ensure_tag(conn, &name)?;
        Ok(conn.query_row(
          &format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.tag_id = ?1"),
          params![tag_id],
          |row| RawTag::from_row(row, 0),
        )?)
      })
      .await?;

    raw.into_tag()
  }

  async fn get_tag(&self, id: Uuid) -> Result<Option<Tag>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTag> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.tag_id = ?1"),
            params![id_str],
            |row| RawTag::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTag::into_tag).transpose()
  }

  async fn list_tags(&self) -> Result<Vec<Tag>> {
    let raws: Vec<RawTag> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {TAG_COLUMNS} FROM tags t ORDER BY t.name"))?;
        let rows = stmt
          .query_map([], |row| RawTag::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTag::into_tag).collect()
  }

  async fn delete_tag(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM tags WHERE tag_id = ?1", params![id_str])?)
      })
      .await?;
    Ok(n > 0)
  }

  // ── Quotes ────────────────────────────────────────────────────────────────

  async fn create_quote(&self, input: NewQuote) -> Result<Quote> {
    let quote_id   = Uuid::new_v4();
    let id_str     = encode_uuid(quote_id);
    let user_str   = encode_uuid(input.user_id);
    let book_str   = encode_uuid(input.book_id);
    let at_str     = encode_dt(now());
    let text       = input.text;
    let context    = input.context;
    let tags       = input.tags;

    let raw: RawQuote = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO quotes (quote_id, user_id, book_id, text, context, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![id_str, user_str, book_str, text, context, at_str],
        )?;
        attach_tags(&tx, &id_str, &tags)?;
        let raw = query_quote(&tx, &id_str)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_quote()
  }

  async fn get_quote(&self, id: Uuid) -> Result<Option<Quote>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(query_quote(conn, &id_str)?))
      .await?;
    raw.map(RawQuote::into_quote).transpose()
  }

  async fn list_quotes(&self, query: &QuoteQuery) -> Result<Vec<Quote>> {
    let user_str   = query.user_id.map(encode_uuid);
    let book_str   = query.book_id.map(encode_uuid);
    let tag        = query.tag.clone();
    let limit_val  = encode_count(query.limit.unwrap_or(DEFAULT_LIST_LIMIT));
    let offset_val = encode_count(query.offset.unwrap_or(0));

    let raws: Vec<RawQuote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUOTE_COLUMNS} FROM quotes q
           WHERE (?1 IS NULL OR q.user_id = ?1)
             AND (?2 IS NULL OR q.book_id = ?2)
             AND (?3 IS NULL OR EXISTS (
                   SELECT 1 FROM quote_tags qt
                   JOIN tags t ON t.tag_id = qt.tag_id
                   WHERE qt.quote_id = q.quote_id AND t.name = ?3))
           ORDER BY q.created_at DESC, q.rowid DESC
           LIMIT ?4 OFFSET ?5"
        ))?;
        let mut rows = stmt
          .query_map(
            params![user_str, book_str, tag, limit_val, offset_val],
            |row| RawQuote::from_row(row, 0),
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        for q in &mut rows {
          q.tags = query_quote_tags(conn, &q.quote_id)?;
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuote::into_quote).collect()
  }

  async fn update_quote(&self, id: Uuid, update: QuoteUpdate) -> Result<Option<Quote>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawQuote> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(
          "UPDATE quotes
           SET text    = COALESCE(?2, text),
               context = COALESCE(?3, context)
           WHERE quote_id = ?1",
          params![id_str, update.text, update.context],
        )?;
        if n == 0 {
          return Ok(None);
        }
        if let Some(tags) = &update.tags {
          tx.execute("DELETE FROM quote_tags WHERE quote_id = ?1", params![id_str])?;
          attach_tags(&tx, &id_str, tags)?;
        }
        let raw = query_quote(&tx, &id_str)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawQuote::into_quote).transpose()
  }

  async fn delete_quote(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM quotes WHERE quote_id = ?1", params![id_str])?)
      })
      .await?;
    Ok(n > 0)
  }

  async fn feed(&self, limit: usize, offset: usize) -> Result<Vec<FeedEntry>> {
    let limit_val  = encode_count(limit);
    let offset_val = encode_count(offset);

    let raws: Vec<RawFeedEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUOTE_COLUMNS}, {BOOK_COLUMNS}
           FROM quotes q
           JOIN books b ON b.book_id = q.book_id
           ORDER BY q.created_at DESC, q.rowid DESC
           LIMIT ?1 OFFSET ?2"
        ))?;
        let pairs = stmt
          .query_map(params![limit_val, offset_val], |row| {
            Ok((RawQuote::from_row(row, 0)?, RawBook::from_row(row, 6)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut entries = Vec::with_capacity(pairs.len());
        for (mut quote, book) in pairs {
          quote.tags    = query_quote_tags(conn, &quote.quote_id)?;
          let reactions = query_reactions(conn, &quote.quote_id)?;
          let comments  = query_comments(conn, &quote.quote_id)?;
          entries.push(RawFeedEntry { quote, book, reactions, comments });
        }
        Ok(entries)
      })
      .await?;

    raws.into_iter().map(RawFeedEntry::into_entry).collect()
  }

  // ── Reactions ─────────────────────────────────────────────────────────────

  async fn toggle_reaction(
    &self,
    user_id:  Uuid,
    quote_id: Uuid,
    kind:     ReactionKind,
  ) -> Result<ToggledReaction> {
    let user_str  = encode_uuid(user_id);
    let quote_str = encode_uuid(quote_id);
    let at_str    = encode_dt(now());

    let (status, raw): (ToggleOutcome, Option<RawReaction>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing: Option<RawReaction> = tx
          .query_row(
            &format!(
              "SELECT {REACTION_COLUMNS} FROM reactions r
               WHERE r.user_id = ?1 AND r.quote_id = ?2"
            ),
            params![user_str, quote_str],
            |row| RawReaction::from_row(row, 0),
          )
          .optional()?;

        let held = existing
          .as_ref()
          .map(|r| r.kind.parse::<ReactionKind>())
          .transpose()
          .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
        let status = plan_toggle(held, kind);

        let raw = match (status, existing) {
          (ToggleOutcome::Removed, Some(r)) => {
            tx.execute(
              "DELETE FROM reactions WHERE reaction_id = ?1",
              params![r.reaction_id],
            )?;
            None
          }
          (ToggleOutcome::Updated, Some(mut r)) => {
            tx.execute(
              "UPDATE reactions SET kind = ?1 WHERE reaction_id = ?2",
              params![kind.as_str(), r.reaction_id],
            )?;
            r.kind = kind.as_str().to_owned();
            Some(r)
          }
          _ => {
            let r = RawReaction {
              reaction_id: encode_uuid(Uuid::new_v4()),
              user_id:     user_str,
              quote_id:    quote_str,
              kind:        kind.as_str().to_owned(),
              created_at:  at_str,
            };
            tx.execute(
              "INSERT INTO reactions (reaction_id, user_id, quote_id, kind, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              params![r.reaction_id, r.user_id, r.quote_id, r.kind, r.created_at],
            )?;
            Some(r)
          }
        };

        tx.commit()?;
        Ok((status, raw))
      })
      .await?;

    Ok(ToggledReaction {
      status,
      reaction: raw.map(RawReaction::into_reaction).transpose()?,
    })
  }

  async fn list_reactions(&self, quote_id: Uuid) -> Result<Vec<Reaction>> {
    let quote_str = encode_uuid(quote_id);
    let raws = self
      .conn
      .call(move |conn| Ok(query_reactions(conn, &quote_str)?))
      .await?;
    raws.into_iter().map(RawReaction::into_reaction).collect()
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(&self, input: NewComment) -> Result<Comment> {
    let at = now();
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      user_id:    input.user_id,
      quote_id:   input.quote_id,
      parent_id:  input.parent_id,
      content:    input.content,
      created_at: at,
      updated_at: at,
    };

    let id_str     = encode_uuid(comment.comment_id);
    let user_str   = encode_uuid(comment.user_id);
    let quote_str  = encode_uuid(comment.quote_id);
    let parent_str = comment.parent_id.map(encode_uuid);
    let content    = comment.content.clone();
    let at_str     = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (
             comment_id, user_id, quote_id, parent_id, content, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          params![id_str, user_str, quote_str, parent_str, content, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(query_comment(conn, &id_str)?))
      .await?;
    raw.map(RawComment::into_comment).transpose()
  }

  async fn list_comments(&self, quote_id: Uuid) -> Result<Vec<Comment>> {
    let quote_str = encode_uuid(quote_id);
    let raws = self
      .conn
      .call(move |conn| Ok(query_comments(conn, &quote_str)?))
      .await?;
    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn update_comment(&self, id: Uuid, content: String) -> Result<Option<Comment>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE comments SET content = ?1, updated_at = ?2 WHERE comment_id = ?3",
          params![content, at_str, id_str],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(query_comment(conn, &id_str)?)
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn delete_comment(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM comments WHERE comment_id = ?1", params![id_str])?)
      })
      .await?;
    Ok(n > 0)
  }

  // ── Favorites ─────────────────────────────────────────────────────────────

  async fn add_favorite(&self, user_id: Uuid, book_id: Uuid) -> Result<Option<Favorite>> {
    let favorite = Favorite {
      favorite_id: Uuid::new_v4(),
      user_id,
      book_id,
      created_at: now(),
    };

    let id_str   = encode_uuid(favorite.favorite_id);
    let user_str = encode_uuid(user_id);
    let book_str = encode_uuid(book_id);
    let at_str   = encode_dt(favorite.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT INTO favorites (favorite_id, user_id, book_id, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (user_id, book_id) DO NOTHING",
          params![id_str, user_str, book_str, at_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(inserted.then_some(favorite))
  }

  async fn get_favorite(&self, id: Uuid) -> Result<Option<Favorite>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFavorite> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {FAVORITE_COLUMNS} FROM favorites f WHERE f.favorite_id = ?1"),
            params![id_str],
            |row| RawFavorite::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawFavorite::into_favorite).transpose()
  }

  async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteDetail>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<(RawFavorite, RawBook)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FAVORITE_COLUMNS}, {BOOK_COLUMNS}
           FROM favorites f
           JOIN books b ON b.book_id = f.book_id
           WHERE f.user_id = ?1
           ORDER BY f.created_at DESC, f.rowid DESC"
        ))?;
        let rows = stmt
          .query_map(params![user_str], |row| {
            Ok((RawFavorite::from_row(row, 0)?, RawBook::from_row(row, 4)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(favorite, book)| favorite.into_detail(book))
      .collect()
  }

  async fn remove_favorite(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM favorites WHERE favorite_id = ?1", params![id_str])?)
      })
      .await?;
    Ok(n > 0)
  }
}

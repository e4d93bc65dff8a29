//! The `LibraryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `quoteshelf-store-sqlite`).
//! Higher layers (`quoteshelf-catalog`, `quoteshelf-api`) depend on this
//! abstraction, not on any concrete backend.
//!
//! Inserts guarded by a uniqueness constraint return `Ok(None)` when the
//! constraint rejects the row, so callers can tell a conflict apart from a
//! backend failure without inspecting backend-specific errors.

use std::future::Future;

use uuid::Uuid;

use crate::{
  book::{Book, NewBook},
  comment::{Comment, NewComment},
  favorite::{Favorite, FavoriteDetail},
  quote::{FeedEntry, NewQuote, Quote, QuoteQuery, QuoteUpdate},
  reaction::{ReactionKind, Reaction, ToggledReaction},
  tag::Tag,
  user::{NewUser, User, UserCredentials},
};

/// Abstraction over a quoteshelf storage backend.
///
/// Deleting a user, quote, book or comment cascades to everything that
/// belongs to it.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LibraryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns `None` if the username or email is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up a user and their password hash by username.
  fn find_credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + 'a;

  fn email_registered<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Grant or revoke admin rights. Returns the updated user, or `None` if no
  /// such username exists.
  fn set_admin<'a>(
    &'a self,
    username: &'a str,
    is_admin: bool,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Delete a user and everything they own. Returns `false` if not found.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record a bearer token (by hash) as belonging to `user_id`.
  fn store_token(
    &self,
    user_id: Uuid,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn user_for_token<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Forget a token. Returns `false` if it was not known.
  fn revoke_token<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Books ─────────────────────────────────────────────────────────────

  fn get_book(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + '_;

  fn get_book_by_external_id<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + 'a;

  /// Persist a book. Returns `None` if a book with the same `external_id`
  /// already exists; the existing row is left untouched.
  fn create_book(
    &self,
    input: NewBook,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + '_;

  /// All persisted books, most recently created first.
  fn list_books(
    &self,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  // ── Tags ──────────────────────────────────────────────────────────────

  /// Return the tag with this (already normalised) name, creating it if
  /// needed.
  fn get_or_create_tag(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Tag, Self::Error>> + Send + '_;

  fn get_tag(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Tag>, Self::Error>> + Send + '_;

  /// All tags, ordered by name.
  fn list_tags(
    &self,
  ) -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send + '_;

  /// Delete a tag and detach it from every quote.
  fn delete_tag(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Quotes ────────────────────────────────────────────────────────────

  /// Persist a quote, creating any tags it names that do not exist yet.
  fn create_quote(
    &self,
    input: NewQuote,
  ) -> impl Future<Output = Result<Quote, Self::Error>> + Send + '_;

  fn get_quote(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Quote>, Self::Error>> + Send + '_;

  /// Quotes matching `query`, newest first.
  fn list_quotes<'a>(
    &'a self,
    query: &'a QuoteQuery,
  ) -> impl Future<Output = Result<Vec<Quote>, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns `None` if the quote does not exist.
  fn update_quote(
    &self,
    id: Uuid,
    update: QuoteUpdate,
  ) -> impl Future<Output = Result<Option<Quote>, Self::Error>> + Send + '_;

  fn delete_quote(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The global feed: newest quotes first, each with its book, reactions and
  /// comments.
  fn feed(
    &self,
    limit: usize,
    offset: usize,
  ) -> impl Future<Output = Result<Vec<FeedEntry>, Self::Error>> + Send + '_;

  // ── Reactions ─────────────────────────────────────────────────────────

  /// Apply the create/flip/delete toggle for (`user_id`, `quote_id`)
  /// atomically. See [`plan_toggle`](crate::reaction::plan_toggle).
  fn toggle_reaction(
    &self,
    user_id: Uuid,
    quote_id: Uuid,
    kind: ReactionKind,
  ) -> impl Future<Output = Result<ToggledReaction, Self::Error>> + Send + '_;

  fn list_reactions(
    &self,
    quote_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Reaction>, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Comments on a quote, oldest first.
  fn list_comments(
    &self,
    quote_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  fn update_comment(
    &self,
    id: Uuid,
    content: String,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Delete a comment and, transitively, its replies.
  fn delete_comment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Favorites ─────────────────────────────────────────────────────────

  /// Returns `None` if the user already favorited this book.
  fn add_favorite(
    &self,
    user_id: Uuid,
    book_id: Uuid,
  ) -> impl Future<Output = Result<Option<Favorite>, Self::Error>> + Send + '_;

  fn get_favorite(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Favorite>, Self::Error>> + Send + '_;

  /// A user's favorites, newest first.
  fn list_favorites(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<FavoriteDetail>, Self::Error>> + Send + '_;

  fn remove_favorite(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

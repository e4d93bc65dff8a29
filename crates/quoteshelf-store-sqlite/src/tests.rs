//! Integration tests for `SqliteStore` against an in-memory database.

use quoteshelf_core::{
  book::{Book, NewBook},
  comment::NewComment,
  quote::{NewQuote, Quote, QuoteQuery, QuoteUpdate},
  reaction::{ReactionKind, ToggleOutcome},
  store::LibraryStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str) -> User {
  s.create_user(NewUser {
    username:      name.into(),
    email:         format!("{name}@example.com"),
    password_hash: "$argon2id$fake".into(),
  })
  .await
  .unwrap()
  .expect("fresh username")
}

fn new_book(external_id: &str) -> NewBook {
  NewBook {
    external_id: external_id.into(),
    title:       "Meditations".into(),
    authors:     vec!["Marcus Aurelius".into()],
    description: String::new(),
    cover_image: "http://books.example/cover.jpg".into(),
    genres:      vec!["Philosophy".into()],
  }
}

async fn book(s: &SqliteStore, external_id: &str) -> Book {
  s.create_book(new_book(external_id))
    .await
    .unwrap()
    .expect("fresh external id")
}

async fn quote(s: &SqliteStore, user: &User, book: &Book, tags: &[&str]) -> Quote {
  s.create_quote(NewQuote {
    user_id: user.user_id,
    book_id: book.book_id,
    text:    "You have power over your mind, not outside events.".into(),
    context: "Book VI".into(),
    tags:    tags.iter().map(|t| t.to_string()).collect(),
  })
  .await
  .unwrap()
}

// ─── Users & sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_rejects_taken_username_and_email() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  assert!(!alice.is_admin);

  let same_name = s
    .create_user(NewUser {
      username:      "alice".into(),
      email:         "other@example.com".into(),
      password_hash: "x".into(),
    })
    .await
    .unwrap();
  assert!(same_name.is_none());

  let same_email = s
    .create_user(NewUser {
      username:      "alice2".into(),
      email:         "alice@example.com".into(),
      password_hash: "x".into(),
    })
    .await
    .unwrap();
  assert!(same_email.is_none());

  assert!(s.email_registered("alice@example.com").await.unwrap());
  assert!(!s.email_registered("nobody@example.com").await.unwrap());
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn credentials_resolve_by_username() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let creds = s.find_credentials("alice").await.unwrap().unwrap();
  assert_eq!(creds.user, alice);
  assert_eq!(creds.password_hash, "$argon2id$fake");
  assert!(s.find_credentials("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn tokens_resolve_until_revoked() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  s.store_token(alice.user_id, "hash-1".into()).await.unwrap();
  let found = s.user_for_token("hash-1").await.unwrap();
  assert_eq!(found.map(|u| u.user_id), Some(alice.user_id));

  assert!(s.revoke_token("hash-1").await.unwrap());
  assert!(!s.revoke_token("hash-1").await.unwrap());
  assert!(s.user_for_token("hash-1").await.unwrap().is_none());
}

#[tokio::test]
async fn set_admin_updates_flag() {
  let s = store().await;
  user(&s, "alice").await;

  let promoted = s.set_admin("alice", true).await.unwrap().unwrap();
  assert!(promoted.is_admin);
  assert!(s.set_admin("ghost", true).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_user_cascades_owned_rows() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;
  let q = quote(&s, &alice, &b, &["stoic"]).await;
  s.store_token(alice.user_id, "hash".into()).await.unwrap();
  s.add_favorite(alice.user_id, b.book_id).await.unwrap().unwrap();

  assert!(s.delete_user(alice.user_id).await.unwrap());
  assert!(s.get_quote(q.quote_id).await.unwrap().is_none());
  assert!(s.user_for_token("hash").await.unwrap().is_none());
  assert!(s.list_favorites(alice.user_id).await.unwrap().is_empty());
  // The book itself is shared and survives.
  assert!(s.get_book(b.book_id).await.unwrap().is_some());
}

// ─── Books ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_book_and_lookup_by_external_id() {
  let s = store().await;
  let created = book(&s, "zyTCAlFPjgYC").await;

  let by_ext = s.get_book_by_external_id("zyTCAlFPjgYC").await.unwrap();
  assert_eq!(by_ext.as_ref(), Some(&created));
  let by_id = s.get_book(created.book_id).await.unwrap();
  assert_eq!(by_id, Some(created));
  assert!(s.get_book_by_external_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn create_book_conflict_returns_none_and_keeps_first_row() {
  let s = store().await;
  let first = book(&s, "vol-1").await;

  let mut second = new_book("vol-1");
  second.title = "Different".into();
  assert!(s.create_book(second).await.unwrap().is_none());

  let stored = s.get_book_by_external_id("vol-1").await.unwrap().unwrap();
  assert_eq!(stored.book_id, first.book_id);
  assert_eq!(stored.title, "Meditations");
  assert_eq!(s.list_books().await.unwrap().len(), 1);
}

// ─── Tags & quotes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn quote_tags_are_shared_and_sorted() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;

  let q1 = quote(&s, &alice, &b, &["stoic", "mind"]).await;
  let q2 = quote(&s, &alice, &b, &["stoic"]).await;
  assert_eq!(q1.tags, ["mind", "stoic"]);
  assert_eq!(q2.tags, ["stoic"]);

  let tags = s.list_tags().await.unwrap();
  assert_eq!(tags.len(), 2);
  assert_eq!(tags[0].name, "mind");

  let again = s.get_or_create_tag("stoic".into()).await.unwrap();
  assert_eq!(again.tag_id, tags[1].tag_id);
  assert_eq!(again.slug, "stoic");
}

#[tokio::test]
async fn delete_tag_detaches_from_quotes() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;
  let q = quote(&s, &alice, &b, &["stoic", "mind"]).await;

  let tag = s.get_or_create_tag("mind".into()).await.unwrap();
  assert!(s.delete_tag(tag.tag_id).await.unwrap());
  assert!(s.get_tag(tag.tag_id).await.unwrap().is_none());

  let q = s.get_quote(q.quote_id).await.unwrap().unwrap();
  assert_eq!(q.tags, ["stoic"]);
}

#[tokio::test]
async fn update_quote_replaces_tags_only_when_given() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;
  let q = quote(&s, &alice, &b, &["stoic"]).await;

  let updated = s
    .update_quote(q.quote_id, QuoteUpdate {
      text: Some("Waste no more time arguing.".into()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.text, "Waste no more time arguing.");
  assert_eq!(updated.context, "Book VI");
  assert_eq!(updated.tags, ["stoic"]);

  let retagged = s
    .update_quote(q.quote_id, QuoteUpdate {
      tags: Some(vec!["virtue".into()]),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(retagged.tags, ["virtue"]);

  let missing = s
    .update_quote(Uuid::new_v4(), QuoteUpdate::default())
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn list_quotes_filters_and_orders_newest_first() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let b1 = book(&s, "vol-1").await;
  let b2 = book(&s, "vol-2").await;

  let q1 = quote(&s, &alice, &b1, &["stoic"]).await;
  let q2 = quote(&s, &bob, &b1, &[]).await;
  let q3 = quote(&s, &alice, &b2, &["stoic"]).await;

  let all = s.list_quotes(&QuoteQuery::default()).await.unwrap();
  let ids: Vec<_> = all.iter().map(|q| q.quote_id).collect();
  assert_eq!(ids, [q3.quote_id, q2.quote_id, q1.quote_id]);

  let by_alice = s
    .list_quotes(&QuoteQuery { user_id: Some(alice.user_id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_alice.len(), 2);

  let by_book = s
    .list_quotes(&QuoteQuery { book_id: Some(b1.book_id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_book.len(), 2);

  let tagged = s
    .list_quotes(&QuoteQuery { tag: Some("stoic".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(tagged.len(), 2);
  assert!(tagged.iter().all(|q| q.tags.contains(&"stoic".to_string())));

  let page = s
    .list_quotes(&QuoteQuery { limit: Some(1), offset: Some(1), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].quote_id, q2.quote_id);
}

#[tokio::test]
async fn delete_quote_cascades_reactions_and_comments() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;
  let q = quote(&s, &alice, &b, &[]).await;

  s.toggle_reaction(alice.user_id, q.quote_id, ReactionKind::Like).await.unwrap();
  let c = s
    .add_comment(NewComment {
      user_id:   alice.user_id,
      quote_id:  q.quote_id,
      parent_id: None,
      content:   "So true.".into(),
    })
    .await
    .unwrap();

  assert!(s.delete_quote(q.quote_id).await.unwrap());
  assert!(!s.delete_quote(q.quote_id).await.unwrap());
  assert!(s.list_reactions(q.quote_id).await.unwrap().is_empty());
  assert!(s.get_comment(c.comment_id).await.unwrap().is_none());
}

// ─── Reactions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_same_kind_twice_removes() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;
  let q = quote(&s, &alice, &b, &[]).await;

  let first = s
    .toggle_reaction(alice.user_id, q.quote_id, ReactionKind::Love)
    .await
    .unwrap();
  assert_eq!(first.status, ToggleOutcome::Created);
  assert_eq!(first.reaction.as_ref().map(|r| r.kind), Some(ReactionKind::Love));

  let second = s
    .toggle_reaction(alice.user_id, q.quote_id, ReactionKind::Love)
    .await
    .unwrap();
  assert_eq!(second.status, ToggleOutcome::Removed);
  assert!(second.reaction.is_none());
  assert!(s.list_reactions(q.quote_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn toggle_different_kind_updates_in_place() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;
  let q = quote(&s, &alice, &b, &[]).await;

  let created = s
    .toggle_reaction(alice.user_id, q.quote_id, ReactionKind::Like)
    .await
    .unwrap()
    .reaction
    .unwrap();

  let updated = s
    .toggle_reaction(alice.user_id, q.quote_id, ReactionKind::Think)
    .await
    .unwrap();
  assert_eq!(updated.status, ToggleOutcome::Updated);

  let third = s
    .toggle_reaction(alice.user_id, q.quote_id, ReactionKind::Inspire)
    .await
    .unwrap();
  assert_eq!(third.status, ToggleOutcome::Updated);

  let reactions = s.list_reactions(q.quote_id).await.unwrap();
  assert_eq!(reactions.len(), 1);
  assert_eq!(reactions[0].kind, ReactionKind::Inspire);
  assert_eq!(reactions[0].reaction_id, created.reaction_id);
}

#[tokio::test]
async fn reactions_are_per_user() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let b = book(&s, "vol-1").await;
  let q = quote(&s, &alice, &b, &[]).await;

  s.toggle_reaction(alice.user_id, q.quote_id, ReactionKind::Like).await.unwrap();
  let bobs = s
    .toggle_reaction(bob.user_id, q.quote_id, ReactionKind::Like)
    .await
    .unwrap();
  assert_eq!(bobs.status, ToggleOutcome::Created);
  assert_eq!(s.list_reactions(q.quote_id).await.unwrap().len(), 2);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn comment_threads_and_cascading_delete() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let b = book(&s, "vol-1").await;
  let q = quote(&s, &alice, &b, &[]).await;

  let root = s
    .add_comment(NewComment {
      user_id:   alice.user_id,
      quote_id:  q.quote_id,
      parent_id: None,
      content:   "First!".into(),
    })
    .await
    .unwrap();
  let reply = s
    .add_comment(NewComment {
      user_id:   bob.user_id,
      quote_id:  q.quote_id,
      parent_id: Some(root.comment_id),
      content:   "Agreed.".into(),
    })
    .await
    .unwrap();

  let listed = s.list_comments(q.quote_id).await.unwrap();
  assert_eq!(listed, [root.clone(), reply.clone()]);

  let edited = s
    .update_comment(reply.comment_id, "Strongly agreed.".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(edited.content, "Strongly agreed.");
  assert!(edited.updated_at >= reply.updated_at);

  assert!(s.delete_comment(root.comment_id).await.unwrap());
  assert!(s.get_comment(reply.comment_id).await.unwrap().is_none());
}

// ─── Favorites ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_favorite_for_same_book_is_rejected() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;

  let fav = s.add_favorite(alice.user_id, b.book_id).await.unwrap();
  assert!(fav.is_some());
  let dup = s.add_favorite(alice.user_id, b.book_id).await.unwrap();
  assert!(dup.is_none());

  let listed = s.list_favorites(alice.user_id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].book, b);

  let fav = fav.unwrap();
  assert_eq!(s.get_favorite(fav.favorite_id).await.unwrap(), Some(fav.clone()));
  assert!(s.remove_favorite(fav.favorite_id).await.unwrap());
  assert!(s.list_favorites(alice.user_id).await.unwrap().is_empty());
}

// ─── Feed ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn feed_assembles_book_reactions_and_comments() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let b = book(&s, "vol-1").await;

  let older = quote(&s, &alice, &b, &["stoic"]).await;
  let newer = quote(&s, &bob, &b, &[]).await;

  s.toggle_reaction(alice.user_id, older.quote_id, ReactionKind::Like).await.unwrap();
  s.toggle_reaction(bob.user_id, older.quote_id, ReactionKind::Love).await.unwrap();
  s.add_comment(NewComment {
    user_id:   bob.user_id,
    quote_id:  older.quote_id,
    parent_id: None,
    content:   "Nice.".into(),
  })
  .await
  .unwrap();

  let feed = s.feed(10, 0).await.unwrap();
  assert_eq!(feed.len(), 2);
  assert_eq!(feed[0].quote.quote_id, newer.quote_id);
  assert_eq!(feed[0].reaction_count, 0);

  let entry = &feed[1];
  assert_eq!(entry.quote.quote_id, older.quote_id);
  assert_eq!(entry.quote.tags, ["stoic"]);
  assert_eq!(entry.book.external_id, "vol-1");
  assert_eq!(entry.reaction_count, 2);
  assert_eq!(entry.comments.len(), 1);

  let page = s.feed(1, 1).await.unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].quote.quote_id, older.quote_id);
}

#[tokio::test]
async fn oversized_paging_saturates() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let b = book(&s, "vol-1").await;
  quote(&s, &alice, &b, &[]).await;
  quote(&s, &alice, &b, &[]).await;

  let all = s
    .list_quotes(&QuoteQuery { limit: Some(usize::MAX), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(all.len(), 2);

  let past_end = s
    .list_quotes(&QuoteQuery { offset: Some(usize::MAX), ..Default::default() })
    .await
    .unwrap();
  assert!(past_end.is_empty());

  assert_eq!(s.feed(usize::MAX, 0).await.unwrap().len(), 2);
  assert!(s.feed(10, usize::MAX).await.unwrap().is_empty());
}

//! SQL schema for the quoteshelf SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,         -- argon2 PHC string
    is_admin      INTEGER NOT NULL DEFAULT 0,
    date_joined   TEXT NOT NULL
);

-- Only the SHA-256 of a bearer token is stored.
CREATE TABLE IF NOT EXISTS auth_tokens (
    token_hash TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books (
    book_id     TEXT PRIMARY KEY,
    external_id TEXT NOT NULL UNIQUE,   -- catalog provider volume id
    title       TEXT NOT NULL,
    authors     TEXT NOT NULL DEFAULT '[]',
    description TEXT NOT NULL DEFAULT '',
    cover_image TEXT NOT NULL DEFAULT '',
    genres      TEXT NOT NULL DEFAULT '[]',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    tag_id TEXT PRIMARY KEY,
    name   TEXT NOT NULL UNIQUE,        -- normalised: trimmed, lowercase
    slug   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS quotes (
    quote_id   TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    book_id    TEXT NOT NULL REFERENCES books(book_id) ON DELETE CASCADE,
    text       TEXT NOT NULL,
    context    TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS quote_tags (
    quote_id TEXT NOT NULL REFERENCES quotes(quote_id) ON DELETE CASCADE,
    tag_id   TEXT NOT NULL REFERENCES tags(tag_id) ON DELETE CASCADE,
    PRIMARY KEY (quote_id, tag_id)
);

CREATE TABLE IF NOT EXISTS reactions (
    reaction_id TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    quote_id    TEXT NOT NULL REFERENCES quotes(quote_id) ON DELETE CASCADE,
    kind        TEXT NOT NULL CHECK (kind IN ('LIKE', 'LOVE', 'THINK', 'INSPIRE')),
    created_at  TEXT NOT NULL,
    UNIQUE (user_id, quote_id)
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    quote_id   TEXT NOT NULL REFERENCES quotes(quote_id) ON DELETE CASCADE,
    parent_id  TEXT REFERENCES comments(comment_id) ON DELETE CASCADE,
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS favorites (
    favorite_id TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    book_id     TEXT NOT NULL REFERENCES books(book_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    UNIQUE (user_id, book_id)
);

CREATE INDEX IF NOT EXISTS books_title_idx     ON books(title);
CREATE INDEX IF NOT EXISTS books_created_idx   ON books(created_at);
CREATE INDEX IF NOT EXISTS quotes_created_idx  ON quotes(created_at);
CREATE INDEX IF NOT EXISTS quotes_user_idx     ON quotes(user_id);
CREATE INDEX IF NOT EXISTS quotes_book_idx     ON quotes(book_id);
CREATE INDEX IF NOT EXISTS reactions_quote_idx ON reactions(quote_id);
CREATE INDEX IF NOT EXISTS reactions_kind_idx  ON reactions(kind);
CREATE INDEX IF NOT EXISTS comments_quote_idx  ON comments(quote_id);

PRAGMA user_version = 1;
";

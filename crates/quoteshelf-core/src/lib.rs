//! Core types and trait definitions for the quoteshelf reading service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod book;
pub mod comment;
pub mod error;
pub mod favorite;
pub mod quote;
pub mod reaction;
pub mod store;
pub mod tag;
pub mod user;

pub use error::{Error, Result};

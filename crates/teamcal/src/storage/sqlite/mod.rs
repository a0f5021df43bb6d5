//! SQLite document store backend.
//!
//! This module provides a SQLite-based implementation of the document store
//! contract using `rusqlite` for synchronous operations and `tokio-rusqlite`
//! for async wrapping. Documents are kept as JSON text, keyed by
//! `(collection, id)`.

mod error;
mod repository;
mod schema;

pub use repository::SqliteDocumentStore;

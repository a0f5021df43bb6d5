//! In-memory document store backend for testing.
//!
//! This module provides an in-memory implementation of the document store
//! contract that keeps all collections in HashMaps wrapped in
//! `Arc<RwLock<_>>`. This is useful for testing and for running the CLI
//! without a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use teamcal::storage::inmemory::InMemoryDocumentStore;
//!
//! let store = InMemoryDocumentStore::new();
//! // Use store for testing...
//! ```

mod repository;

pub use repository::InMemoryDocumentStore;

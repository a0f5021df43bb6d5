//! Document store implementations.
//!
//! This module provides concrete implementations of the `DocumentStore`
//! contract defined in `teamcal_core::storage`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always available; it backs the test suites and
//! the CLI's `--memory` mode.
//!
//! # Examples
//!
//! Build without SQLite:
//! ```bash
//! cargo build -p teamcal --no-default-features
//! ```

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryDocumentStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDocumentStore;

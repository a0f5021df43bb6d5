//! teamcal - a sharded, cached event source for team calendars.
//!
//! The [`source::EventsSource`] session sits between a calendar view and a
//! [`teamcal_core::storage::DocumentStore`], keeping one team's events in
//! monthly collections and migrating legacy single-collection data on the
//! fly.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod source;
pub mod storage;

pub use error::{Result, SourceError};
pub use source::{EventsSource, MigrationReport};

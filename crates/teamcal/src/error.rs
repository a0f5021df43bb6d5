//! Event source error types.

use thiserror::Error;

use teamcal_core::calendar::EventError;
use teamcal_core::storage::{DateRangeError, StoreError};

/// Result type alias for event source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while reading or writing events.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid event: {0}")]
    Validation(#[from] EventError),

    #[error("Invalid range: {0}")]
    Range(#[from] DateRangeError),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Event {id} has an unreadable start date: {value:?}")]
    InvalidStoredDate { id: String, value: String },

    #[error("Store returned a document without an id in {collection}")]
    MissingId { collection: String },

    #[error("Migration task failed: {0}")]
    Migration(String),
}

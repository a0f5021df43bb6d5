use thiserror::Error;

/// Errors that can occur when validating a calendar event draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event title too long (max 200 characters)")]
    TitleTooLong,
    #[error("End date must be after or equal to start date")]
    InvalidDateRange,
}

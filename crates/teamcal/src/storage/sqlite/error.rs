//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `StoreError` from
//! `teamcal_core::storage`. Specific errors are mapped to semantic variants
//! (e.g., PRIMARY KEY constraint to AlreadyExists).

use teamcal_core::storage::StoreError;

/// Maps a rusqlite error for a known document to a StoreError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_PRIMARYKEY` / `SQLITE_CONSTRAINT_UNIQUE` → `StoreError::AlreadyExists`
/// - `QueryReturnedNoRows` → `StoreError::NotFound`
/// - `CannotOpen` → `StoreError::ConnectionFailed`
/// - All other errors → `StoreError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, collection: &str, id: &str) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            StoreError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        },

        _ => StoreError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error for a known document to a StoreError.
pub fn map_document_error(err: tokio_rusqlite::Error, collection: &str, id: &str) -> StoreError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, collection, id)
        }
        tokio_rusqlite::Error::Close(_) => {
            StoreError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => StoreError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error from a query that is not about one document.
pub fn map_query_error(err: tokio_rusqlite::Error) -> StoreError {
    match &err {
        tokio_rusqlite::Error::Close(_) => {
            StoreError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => StoreError::QueryFailed(err.to_string()),
    }
}

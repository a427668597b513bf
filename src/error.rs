//! Error types for PocketBook Core

use thiserror::Error;

/// Main error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Operation invoked before the store's `init()` completed
    #[error("Store not initialized")]
    NotInitialized,

    /// Unique-name constraint violated on add (category or currency)
    #[error("\"{0}\" already exists")]
    DuplicateName(String),

    /// Attempt to delete the protected "None" category
    #[error("The \"None\" category is protected and cannot be deleted")]
    ProtectedCategory,

    /// Attempt to delete the last remaining currency
    #[error("At least one currency is required")]
    LastCurrency,

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Backup document could not be parsed or replayed
    #[error("Import error: {0}")]
    ImportError(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::ImportError(err.to_string())
    }
}

/// Returns true when the underlying SQLite error is a unique-constraint
/// violation, so `add` operations can surface [`StoreError::DuplicateName`]
/// instead of a generic database error.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

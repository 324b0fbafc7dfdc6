//! Error types for the store.

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to create the database directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A referenced record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The blocking database task failed or the connection lock was poisoned.
    #[error("database task failed: {0}")]
    Task(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

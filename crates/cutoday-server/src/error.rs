//! Server error types.

use std::io;
use thiserror::Error;

/// Result type for server startup and lifecycle operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (listener, file, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The database could not be opened.
    #[error("Store error: {0}")]
    Store(#[from] cutoday_store::StoreError),

    /// A provider could not be constructed.
    #[error("Provider error: {0}")]
    Provider(#[from] cutoday_providers::ProviderError),

    /// Logging could not be initialized.
    #[error("Tracing error: {0}")]
    Tracing(#[from] cutoday_core::TracingError),
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

//! Error types for blob storage.

use std::io;
use thiserror::Error;

pub type BlobResult<T> = Result<T, BlobError>;

#[derive(Debug, Error)]
pub enum BlobError {
    /// The key cannot name an object (empty, nested, or hidden).
    #[error("invalid key '{0}'")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
}

//! Secret reference resolver.
//!
//! Credential values in `config.toml` may point outside the file:
//!
//! - `env::VAR_NAME` reads `$VAR_NAME` from the environment
//! - `file::/run/secrets/key` reads a file and trims surrounding whitespace
//! - anything else is used as plain text

use std::path::PathBuf;

use thiserror::Error;

/// A secret reference that could not be resolved.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("environment variable `{0}` is not set")]
    MissingEnv(String),

    #[error("failed to read secret file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("secret file {0} is empty")]
    EmptyFile(PathBuf),
}

/// Resolves a value that may contain a secret reference prefix.
pub fn resolve(value: &str) -> Result<String, SecretError> {
    if let Some(var) = value.strip_prefix("env::") {
        std::env::var(var).map_err(|_| SecretError::MissingEnv(var.to_string()))
    } else if let Some(path) = value.strip_prefix("file::") {
        resolve_file(PathBuf::from(path))
    } else {
        Ok(value.to_string())
    }
}

fn resolve_file(path: PathBuf) -> Result<String, SecretError> {
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) => return Err(SecretError::File { path, source }),
    };
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SecretError::EmptyFile(path));
    }
    Ok(trimmed.to_string())
}

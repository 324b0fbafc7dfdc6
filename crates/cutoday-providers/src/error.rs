//! Error types for event source operations.
//!
//! Every adapter failure is reported as one [`ProviderError`] carrying a
//! [`ProviderErrorKind`], the upstream HTTP status when there was one, and a
//! human-readable message.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// The upstream service could not be reached, answered with an error
    /// status, timed out, or returned a body that could not be read.
    SourceUnavailable,
    /// A required credential or setting is absent.
    ConfigurationMissing,
    /// A request field is missing or malformed.
    ValidationError,
    /// The requested record or source does not exist.
    NotFound,
}

impl ProviderErrorKind {
    /// Returns the wire name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceUnavailable => "source_unavailable",
            Self::ConfigurationMissing => "configuration_missing",
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error that occurred while fetching from an event source.
#[derive(Debug, Error)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    /// HTTP status returned by the upstream service, if it answered.
    upstream_status: Option<u16>,
    message: String,
    /// The provider that generated this error (e.g., "google", "mobilize").
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given kind and message.
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            upstream_status: None,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    /// Creates a source-unavailable error without an upstream status.
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::SourceUnavailable, message)
    }

    /// Creates a source-unavailable error for an upstream error response.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::source_unavailable(message).with_upstream_status(status)
    }

    /// Creates a configuration-missing error.
    pub fn configuration_missing(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::ConfigurationMissing, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::ValidationError, message)
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NotFound, message)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the upstream HTTP status.
    pub fn with_upstream_status(mut self, status: u16) -> Self {
        self.upstream_status = Some(status);
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn upstream_status(&self) -> Option<u16> {
        self.upstream_status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Returns a copy without the boxed source, which is not cloneable.
    pub fn detached(&self) -> Self {
        Self {
            kind: self.kind,
            upstream_status: self.upstream_status,
            message: self.message.clone(),
            provider: self.provider.clone(),
            source: None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(status) = self.upstream_status {
            write!(f, " (upstream status {})", status)?;
        }
        Ok(())
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

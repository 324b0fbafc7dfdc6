//! EventProvider trait definition.
//!
//! This module defines the [`EventProvider`] trait, the abstraction every
//! event source adapter implements (Google Calendar, Mobilize, uploaded
//! images).
//!
//! Providers are responsible for:
//! - Fetching raw events for a [`TimeWindow`] from their backend
//! - Mapping them to [`NormalizedEvent`]s, expanding multi-occurrence events
//! - Reporting failures as [`ProviderError`] instead of panicking

use std::future::Future;
use std::pin::Pin;

use cutoday_core::{EventSource, NormalizedEvent, TimeWindow};

use crate::error::{ProviderError, ProviderResult};

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object safe so the aggregator can hold a list of
/// `Arc<dyn EventProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core abstraction for event sources.
///
/// # Implementation Notes
///
/// - Implementations must be `Send + Sync`; one instance serves every request
/// - `fetch_events` performs one fetch sequence per call and returns a finite list
/// - Every returned event must carry [`EventProvider::source`] as its source
/// - Occurrences outside the window must not be returned
pub trait EventProvider: Send + Sync {
    /// Returns the name of this provider (e.g., "google", "mobilize").
    fn name(&self) -> &str;

    /// Returns the source tag this provider stamps on its events.
    fn source(&self) -> EventSource;

    /// Fetches the normalized events that start inside `window`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, upstream error statuses
    /// and unreadable responses.
    fn fetch_events(&self, window: TimeWindow) -> BoxFuture<'_, ProviderResult<Vec<NormalizedEvent>>>;
}

/// A provider that always returns an error.
///
/// Registered in place of a source whose configuration could not be turned
/// into a working provider, so its endpoint reports why.
#[derive(Debug)]
pub struct ErrorProvider {
    name: String,
    source: EventSource,
    error: ProviderError,
}

impl ErrorProvider {
    /// Creates a new error provider.
    pub fn new(name: impl Into<String>, source: EventSource, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            source,
            error,
        }
    }
}

impl EventProvider for ErrorProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> EventSource {
        self.source
    }

    fn fetch_events(&self, _window: TimeWindow) -> BoxFuture<'_, ProviderResult<Vec<NormalizedEvent>>> {
        let error = self.error.detached().with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn error_provider_returns_error() {
        let provider = ErrorProvider::new(
            "google",
            EventSource::Calendar,
            ProviderError::configuration_missing("calendar_id is empty"),
        );

        assert_eq!(provider.name(), "google");
        assert_eq!(provider.source(), EventSource::Calendar);

        let window = TimeWindow::from_duration(Utc::now(), Duration::days(1));
        let err = provider.fetch_events(window).await.unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::ConfigurationMissing);
        assert_eq!(err.provider(), Some("google"));
    }
}

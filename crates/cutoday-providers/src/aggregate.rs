//! Concurrent fan-out over every configured provider.
//!
//! The [`Aggregator`] runs each provider on its own task against the same
//! window, waits for all of them, and merges what succeeded into one list
//! ordered by date. A failing provider costs its own events and nothing more.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use cutoday_core::{EventSource, NormalizedEvent, TimeWindow, sort_events};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::EventProvider;

/// Default bound on a single provider's fetch.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by the aggregator.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// No provider is registered for the requested source.
    #[error("source '{0}' is not configured")]
    NotConfigured(EventSource),

    /// The provider reported an error.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider task panicked.
    #[error("provider '{provider}' panicked: {message}")]
    Panicked { provider: String, message: String },

    /// Every registered provider panicked.
    #[error("all {} sources failed", .0.len())]
    AllSourcesFailed(Vec<SourceFailure>),
}

/// Why a provider contributed no events.
#[derive(Debug)]
pub enum FailureReason {
    /// The provider returned an error (including timeouts).
    Provider(ProviderError),
    /// The provider task panicked.
    Panicked(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(e) => write!(f, "{}", e),
            Self::Panicked(message) => write!(f, "panicked: {}", message),
        }
    }
}

/// A provider that failed during an aggregate run.
#[derive(Debug)]
pub struct SourceFailure {
    pub provider: String,
    pub source: EventSource,
    pub reason: FailureReason,
}

impl SourceFailure {
    /// Returns true if the provider task panicked.
    pub fn is_panic(&self) -> bool {
        matches!(self.reason, FailureReason::Panicked(_))
    }
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.provider, self.source, self.reason)
    }
}

/// Outcome of an aggregate run.
#[derive(Debug, Default)]
pub struct AggregateResult {
    /// Merged events, ordered by date.
    pub events: Vec<NormalizedEvent>,
    /// Providers that contributed nothing because they failed.
    pub failures: Vec<SourceFailure>,
}

/// Fans a window out to every registered provider.
pub struct Aggregator {
    providers: Vec<Arc<dyn EventProvider>>,
    timeout: Duration,
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("Aggregator")
            .field("providers", &names)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_TIMEOUT)
    }
}

impl Aggregator {
    /// Creates an aggregator with no providers.
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            timeout,
        }
    }

    /// Builder: register a provider. Registration order breaks date ties.
    pub fn with_provider(mut self, provider: Arc<dyn EventProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Registers a provider.
    pub fn register(&mut self, provider: Arc<dyn EventProvider>) {
        info!(provider = provider.name(), source = %provider.source(), "registered provider");
        self.providers.push(provider);
    }

    /// Returns the registered providers.
    pub fn providers(&self) -> &[Arc<dyn EventProvider>] {
        &self.providers
    }

    /// Returns true if any provider serves `source`.
    pub fn has_source(&self, source: EventSource) -> bool {
        self.providers.iter().any(|p| p.source() == source)
    }

    /// Fetches from every provider concurrently and merges the results.
    ///
    /// Provider errors and panics are logged and recorded in
    /// [`AggregateResult::failures`].
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::AllSourcesFailed`] only when providers are
    /// registered and every one of them panicked.
    pub async fn aggregate(&self, window: TimeWindow) -> Result<AggregateResult, AggregateError> {
        let outcomes = self.run_all(&self.providers, window).await;

        let mut result = AggregateResult::default();
        for (provider, outcome) in self.providers.iter().zip(outcomes) {
            match outcome {
                Ok(events) => {
                    info!(
                        provider = provider.name(),
                        event_count = events.len(),
                        "fetched events"
                    );
                    result.events.extend(events);
                }
                Err(reason) => {
                    error!(provider = provider.name(), error = %reason, "provider failed");
                    result.failures.push(SourceFailure {
                        provider: provider.name().to_string(),
                        source: provider.source(),
                        reason,
                    });
                }
            }
        }

        if !self.providers.is_empty() && result.failures.len() == self.providers.len() {
            if result.failures.iter().all(SourceFailure::is_panic) {
                return Err(AggregateError::AllSourcesFailed(result.failures));
            }
            warn!(failed = result.failures.len(), "every provider failed; serving no events");
        }

        sort_events(&mut result.events);
        debug!(
            event_count = result.events.len(),
            failed = result.failures.len(),
            "aggregate complete"
        );
        Ok(result)
    }

    /// Fetches from the providers serving `source`, surfacing their errors.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::NotConfigured`] if no provider serves the
    /// source, or the first provider error or panic otherwise.
    pub async fn fetch_source(
        &self,
        source: EventSource,
        window: TimeWindow,
    ) -> Result<Vec<NormalizedEvent>, AggregateError> {
        let providers: Vec<Arc<dyn EventProvider>> = self
            .providers
            .iter()
            .filter(|p| p.source() == source)
            .cloned()
            .collect();
        if providers.is_empty() {
            return Err(AggregateError::NotConfigured(source));
        }

        let outcomes = self.run_all(&providers, window).await;

        let mut events = Vec::new();
        for (provider, outcome) in providers.iter().zip(outcomes) {
            match outcome {
                Ok(fetched) => events.extend(fetched),
                Err(FailureReason::Provider(e)) => {
                    error!(provider = provider.name(), error = %e, "provider failed");
                    return Err(AggregateError::Provider(e));
                }
                Err(FailureReason::Panicked(message)) => {
                    error!(provider = provider.name(), %message, "provider panicked");
                    return Err(AggregateError::Panicked {
                        provider: provider.name().to_string(),
                        message,
                    });
                }
            }
        }

        sort_events(&mut events);
        Ok(events)
    }

    /// Spawns one task per provider and waits for all of them.
    ///
    /// Outcomes are returned in the order of `providers`.
    async fn run_all(
        &self,
        providers: &[Arc<dyn EventProvider>],
        window: TimeWindow,
    ) -> Vec<Result<Vec<NormalizedEvent>, FailureReason>> {
        let handles = providers
            .iter()
            .map(|provider| tokio::spawn(fetch_with_timeout(Arc::clone(provider), window, self.timeout)));

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(Ok(events)) => Ok(events),
                Ok(Err(e)) => Err(FailureReason::Provider(e)),
                Err(join_error) if join_error.is_panic() => {
                    Err(FailureReason::Panicked(panic_message(join_error.into_panic())))
                }
                Err(join_error) => Err(FailureReason::Panicked(join_error.to_string())),
            })
            .collect()
    }
}

async fn fetch_with_timeout(
    provider: Arc<dyn EventProvider>,
    window: TimeWindow,
    timeout: Duration,
) -> ProviderResult<Vec<NormalizedEvent>> {
    let name = provider.name().to_string();
    match tokio::time::timeout(timeout, provider.fetch_events(window)).await {
        Ok(Ok(events)) => Ok(events),
        Ok(Err(e)) if e.provider().is_none() => Err(e.with_provider(name)),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ProviderError::source_unavailable(format!(
            "timed out after {} ms",
            timeout.as_millis()
        ))
        .with_provider(name)),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Google Calendar provider implementation.

use tracing::{debug, warn};

use cutoday_core::{EventSource, NormalizedEvent, TimeWindow, parse_event_date};

use super::client::{ApiEvent, GoogleCalendarClient};
use super::config::GoogleConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::http;
use crate::provider::{BoxFuture, EventProvider};

/// Google Calendar provider.
///
/// Reads the public community calendar with an API key. Without a key the
/// provider logs a warning and serves no events.
#[derive(Debug)]
pub struct GoogleProvider {
    name: String,
    config: GoogleConfig,
    client: Option<GoogleCalendarClient>,
}

impl GoogleProvider {
    /// Creates a new Google Calendar provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        Self::with_name("google", config)
    }

    /// Creates a new Google Calendar provider with a custom name.
    pub fn with_name(name: impl Into<String>, config: GoogleConfig) -> ProviderResult<Self> {
        let name = name.into();
        config
            .validate()
            .map_err(|e| ProviderError::configuration_missing(e).with_provider(&name))?;

        let client = match config.api_key.as_deref() {
            Some(key) => {
                let http_client =
                    http::build_client(config.timeout).map_err(|e| e.with_provider(&name))?;
                Some(GoogleCalendarClient::new(http_client, &config.base_url, key))
            }
            None => None,
        };

        Ok(Self {
            name,
            config,
            client,
        })
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    async fn fetch_events_impl(&self, window: TimeWindow) -> ProviderResult<Vec<NormalizedEvent>> {
        let Some(client) = &self.client else {
            warn!(provider = %self.name, "no Google API key configured; serving no calendar events");
            return Ok(Vec::new());
        };

        let raw = client
            .list_events(&self.config.calendar_id, &window, self.config.max_pages)
            .await
            .map_err(|e| e.with_provider(&self.name))?;

        let events: Vec<NormalizedEvent> = raw
            .into_iter()
            .filter(|event| starts_in(event, &window))
            .filter_map(|event| self.normalize(event))
            .collect();

        debug!(provider = %self.name, event_count = events.len(), "normalized calendar events");
        Ok(events)
    }

    fn normalize(&self, event: ApiEvent) -> Option<NormalizedEvent> {
        if event.status.as_deref() == Some("cancelled") {
            return None;
        }
        let id = event.id?;

        let mut normalized =
            NormalizedEvent::new(EventSource::Calendar, &id, event.summary.unwrap_or_default())
                .with_description(event.description.unwrap_or_default())
                .with_org(&self.config.org_name)
                .with_event_type(&self.config.event_type);

        if let Some(start) = event.start.value() {
            normalized = normalized.with_date(start);
        }
        if let Some(end) = event.end.value() {
            normalized = normalized.with_end_date(end);
        }
        if let Some(link) = event.html_link {
            normalized = normalized.with_url(link);
        }
        Some(normalized)
    }
}

/// The API bounds on end time, so events already running when the window
/// opens come back too. Undated events are kept.
fn starts_in(event: &ApiEvent, window: &TimeWindow) -> bool {
    event
        .start
        .value()
        .and_then(parse_event_date)
        .is_none_or(|start| window.contains(start))
}

impl EventProvider for GoogleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> EventSource {
        EventSource::Calendar
    }

    fn fetch_events(&self, window: TimeWindow) -> BoxFuture<'_, ProviderResult<Vec<NormalizedEvent>>> {
        Box::pin(self.fetch_events_impl(window))
    }
}

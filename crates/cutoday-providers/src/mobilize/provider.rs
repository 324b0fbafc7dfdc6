//! Mobilize provider implementation.

use std::collections::HashSet;

use tracing::{debug, warn};

use cutoday_core::{EventSource, NormalizedEvent, TimeWindow, format_timestamp, from_epoch_secs};

use super::client::{ApiEvent, MobilizeClient};
use super::config::MobilizeConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::filter::SponsorFilter;
use crate::http;
use crate::provider::{BoxFuture, EventProvider};

/// Mobilize organizing-events provider.
///
/// Every in-window timeslot of an event becomes its own normalized event.
#[derive(Debug)]
pub struct MobilizeProvider {
    name: String,
    config: MobilizeConfig,
    filter: SponsorFilter,
    client: MobilizeClient,
}

impl MobilizeProvider {
    /// Creates a new Mobilize provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: MobilizeConfig) -> ProviderResult<Self> {
        Self::with_name("mobilize", config)
    }

    /// Creates a new Mobilize provider with a custom name.
    pub fn with_name(name: impl Into<String>, config: MobilizeConfig) -> ProviderResult<Self> {
        let name = name.into();
        config
            .validate()
            .map_err(|e| ProviderError::configuration_missing(e).with_provider(&name))?;

        let http_client = http::build_client(config.timeout).map_err(|e| e.with_provider(&name))?;
        let client = MobilizeClient::new(http_client, &config.base_url);

        Ok(Self {
            name,
            filter: config.sponsor_filter(),
            config,
            client,
        })
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &MobilizeConfig {
        &self.config
    }

    async fn fetch_events_impl(&self, window: TimeWindow) -> ProviderResult<Vec<NormalizedEvent>> {
        let feeds: Vec<String> = if self.config.organization_ids.is_empty() {
            vec![self.client.feed_url(None)]
        } else {
            self.config
                .organization_ids
                .iter()
                .map(|id| self.client.feed_url(Some(*id)))
                .collect()
        };

        let mut seen = HashSet::new();
        let mut events = Vec::new();
        for feed in &feeds {
            let raw = self
                .client
                .list_events(feed, &window, self.config.max_pages)
                .await
                .map_err(|e| e.with_provider(&self.name))?;

            // Promoted events show up in more than one organization's feed.
            for event in raw.iter().filter(|e| seen.insert(e.id)) {
                events.extend(expand_event(event, &window, &self.filter));
            }
        }

        debug!(
            provider = %self.name,
            feeds = feeds.len(),
            event_count = events.len(),
            "expanded organizing events"
        );
        Ok(events)
    }
}

impl EventProvider for MobilizeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> EventSource {
        EventSource::Organizing
    }

    fn fetch_events(&self, window: TimeWindow) -> BoxFuture<'_, ProviderResult<Vec<NormalizedEvent>>> {
        Box::pin(self.fetch_events_impl(window))
    }
}

/// Expands one API event into a normalized event per timeslot starting in
/// `window`.
///
/// Returns nothing if the sponsor is filtered out or no timeslot falls in the
/// window.
pub fn expand_event(
    event: &ApiEvent,
    window: &TimeWindow,
    filter: &SponsorFilter,
) -> Vec<NormalizedEvent> {
    let sponsor = event.sponsor.as_ref().and_then(|s| s.name.as_deref());
    if !filter.allows(sponsor) {
        return Vec::new();
    }

    event
        .timeslots
        .iter()
        .filter_map(|slot| {
            let Some(start) = from_epoch_secs(slot.start_date) else {
                warn!(event_id = event.id, start_date = slot.start_date, "timeslot start out of range");
                return None;
            };
            if !window.contains(start) {
                return None;
            }

            let slot_id = slot.id.map_or_else(|| slot.start_date.to_string(), |id| id.to_string());
            let mut normalized = NormalizedEvent::new(
                EventSource::Organizing,
                format!("{}-{}", event.id, slot_id),
                event.title.clone(),
            )
            .with_date(format_timestamp(start))
            .with_event_type(event.event_type.clone().unwrap_or_default());

            if let Some(end) = slot.end_date.and_then(from_epoch_secs) {
                normalized = normalized.with_end_date(format_timestamp(end));
            }
            if let Some(description) = &event.description {
                normalized = normalized.with_description(description);
            }
            if let Some(image) = &event.featured_image_url {
                normalized = normalized.with_image(image);
            }
            if let Some(org) = sponsor {
                normalized = normalized.with_org(org);
            }
            if let Some(url) = &event.browser_url {
                normalized = normalized.with_url(url);
            }
            Some(normalized)
        })
        .collect()
}

//! Uploaded images as an event source.

use tracing::debug;

use cutoday_core::{EventSource, NormalizedEvent, TimeWindow, parse_event_date};
use cutoday_providers::{BoxFuture, EventProvider, ProviderError, ProviderResult};

use crate::repositories::ImageRecord;
use crate::store::Store;

/// Category given to image events.
pub const IMAGE_EVENT_TYPE: &str = "flyer";

/// Serves dated uploads from the `images` table as events.
///
/// Undated images and images whose date does not parse are left out of every
/// window.
#[derive(Debug, Clone)]
pub struct ImageProvider {
    name: String,
    store: Store,
}

impl ImageProvider {
    pub fn new(store: Store) -> Self {
        Self {
            name: "images".to_string(),
            store,
        }
    }

    async fn fetch_events_impl(&self, window: TimeWindow) -> ProviderResult<Vec<NormalizedEvent>> {
        let records = self.store.list_images().await.map_err(|e| {
            ProviderError::source_unavailable(format!("failed to read images: {}", e))
                .with_provider(&self.name)
                .with_source(e)
        })?;

        let total = records.len();
        let mut events: Vec<NormalizedEvent> = records
            .into_iter()
            .filter(|record| {
                record
                    .date
                    .as_deref()
                    .and_then(parse_event_date)
                    .is_some_and(|date| window.contains(date))
            })
            .map(to_event)
            .collect();
        // Stored newest first; events read better oldest first.
        events.reverse();

        debug!(provider = %self.name, total, event_count = events.len(), "selected image events");
        Ok(events)
    }
}

fn to_event(record: ImageRecord) -> NormalizedEvent {
    let mut event = NormalizedEvent::new(
        EventSource::Image,
        record.id.to_string(),
        record.organization.clone().unwrap_or_default(),
    )
    .with_image(&record.url)
    .with_url(record.url)
    .with_event_type(IMAGE_EVENT_TYPE);

    if let Some(org) = record.organization {
        event = event.with_org(org);
    }
    if let Some(date) = record.date {
        event = event.with_date(date);
    }
    event
}

impl EventProvider for ImageProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> EventSource {
        EventSource::Image
    }

    fn fetch_events(&self, window: TimeWindow) -> BoxFuture<'_, ProviderResult<Vec<NormalizedEvent>>> {
        Box::pin(self.fetch_events_impl(window))
    }
}

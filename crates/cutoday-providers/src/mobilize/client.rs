//! Mobilize v1 REST client.

use serde::Deserialize;
use tracing::{debug, warn};

use cutoday_core::TimeWindow;

use crate::error::ProviderResult;
use crate::http;

#[derive(Debug)]
pub(crate) struct MobilizeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MobilizeClient {
    pub(crate) fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of an event feed: one organization's, or the global one.
    pub(crate) fn feed_url(&self, organization_id: Option<u64>) -> String {
        match organization_id {
            Some(id) => format!("{}/organizations/{}/events", self.base_url, id),
            None => format!("{}/events", self.base_url),
        }
    }

    /// Reads every page of a feed for events with a timeslot starting in
    /// `window`.
    ///
    /// Items that do not deserialize are skipped with a warning.
    pub(crate) async fn list_events(
        &self,
        feed_url: &str,
        window: &TimeWindow,
        max_pages: usize,
    ) -> ProviderResult<Vec<ApiEvent>> {
        let start = format!("gte_{}", window.start_epoch_secs());
        let end = format!("lt_{}", window.end_epoch_secs());

        let first = self
            .http_client
            .get(feed_url)
            .query(&[("timeslot_start", start.as_str()), ("timeslot_start", end.as_str())]);
        let mut page: EventPage = http::read_json(http::send(first).await?).await?;

        let mut events = Vec::new();
        let mut pages = 1;
        loop {
            events.extend(page.data.into_iter().filter_map(|item| {
                serde_json::from_value::<ApiEvent>(item)
                    .map_err(|e| warn!(feed = feed_url, error = %e, "skipping malformed event"))
                    .ok()
            }));

            let Some(next) = page.next else { break };
            if pages >= max_pages {
                warn!(feed = feed_url, max_pages, "feed has more pages than allowed; result truncated");
                break;
            }

            // The next link already carries the filters.
            let request = self.http_client.get(&next);
            page = http::read_json(http::send(request).await?).await?;
            pages += 1;
        }

        debug!(feed = feed_url, pages, event_count = events.len(), "read organizing feed");
        Ok(events)
    }
}

/// One page of a Mobilize list response.
#[derive(Debug, Deserialize)]
struct EventPage {
    #[serde(default)]
    data: Vec<serde_json::Value>,
    next: Option<String>,
}

/// An event from the Mobilize API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEvent {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub featured_image_url: Option<String>,
    pub sponsor: Option<ApiSponsor>,
    pub browser_url: Option<String>,
    pub event_type: Option<String>,
    #[serde(default)]
    pub timeslots: Vec<ApiTimeslot>,
}

/// The organization that owns an event.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSponsor {
    pub id: Option<u64>,
    pub name: Option<String>,
}

/// One occurrence of an event, in epoch seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTimeslot {
    pub id: Option<u64>,
    pub start_date: i64,
    pub end_date: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event() {
        let json = r#"{
            "id": 42,
            "title": "Canvass",
            "description": "Door knocking",
            "featured_image_url": "https://img.example/canvass.png",
            "sponsor": { "id": 7, "name": "Utah Votes" },
            "browser_url": "https://www.mobilize.us/utahvotes/event/42/",
            "event_type": "CANVASS",
            "timeslots": [
                { "id": 1, "start_date": 1755252000, "end_date": 1755259200 }
            ]
        }"#;

        let event: ApiEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, 42);
        assert_eq!(event.sponsor.unwrap().name.as_deref(), Some("Utah Votes"));
        assert_eq!(event.timeslots.len(), 1);
        assert_eq!(event.timeslots[0].start_date, 1_755_252_000);
    }

    #[test]
    fn parse_sparse_event() {
        let event: ApiEvent = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(event.title, "");
        assert!(event.sponsor.is_none());
        assert!(event.timeslots.is_empty());
    }

    #[test]
    fn feed_urls() {
        let client = MobilizeClient::new(reqwest::Client::new(), "https://api.mobilize.us/v1/");
        assert_eq!(client.feed_url(None), "https://api.mobilize.us/v1/events");
        assert_eq!(
            client.feed_url(Some(93)),
            "https://api.mobilize.us/v1/organizations/93/events"
        );
    }
}

//! Google Calendar API client.
//!
//! Low-level HTTP access to the `events.list` endpoint with API-key auth.

use serde::Deserialize;
use tracing::{debug, warn};

use cutoday_core::TimeWindow;

use crate::error::ProviderResult;
use crate::http;

/// Google Calendar API client.
#[derive(Debug)]
pub(crate) struct GoogleCalendarClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleCalendarClient {
    pub(crate) fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Lists the expanded single events of a calendar inside `window`,
    /// ordered by start time, following at most `max_pages` pages.
    pub(crate) async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        max_pages: usize,
    ) -> ProviderResult<Vec<ApiEvent>> {
        let mut all_events = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..max_pages {
            let result = self
                .list_events_page(calendar_id, window, page_token.as_deref())
                .await?;

            all_events.extend(result.items);

            match result.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }

            if page + 1 == max_pages {
                warn!(
                    calendar_id,
                    max_pages, "calendar has more pages than allowed; result truncated"
                );
            }
        }

        debug!("fetched {} events from calendar {}", all_events.len(), calendar_id);
        Ok(all_events)
    }

    async fn list_events_page(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let mut request = self.http_client.get(&url).query(&[
            ("key", self.api_key.clone()),
            ("timeMin", window.start.to_rfc3339()),
            ("timeMax", window.end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token.to_string())]);
        }

        let response = http::send(request).await?;
        http::read_json(response).await
    }
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventListResponse {
    #[serde(default)]
    pub(crate) items: Vec<ApiEvent>,
    pub(crate) next_page_token: Option<String>,
}

/// A single event from the Google Calendar API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEvent {
    pub(crate) id: Option<String>,
    pub(crate) summary: Option<String>,
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) start: ApiEventTime,
    #[serde(default)]
    pub(crate) end: ApiEventTime,
    pub(crate) html_link: Option<String>,
    pub(crate) status: Option<String>,
}

/// Event time from the API: `dateTime` for timed events, `date` for
/// all-day events.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEventTime {
    pub(crate) date: Option<String>,
    pub(crate) date_time: Option<String>,
}

impl ApiEventTime {
    /// Returns `dateTime` if present, otherwise `date`.
    pub(crate) fn value(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_list_response() {
        let json = r#"{
            "items": [
                {
                    "id": "event1",
                    "summary": "Test Meeting",
                    "start": { "dateTime": "2024-03-15T10:00:00-06:00" },
                    "end": { "dateTime": "2024-03-15T11:00:00-06:00" },
                    "status": "confirmed"
                }
            ],
            "nextPageToken": "page-2"
        }"#;

        let response: EventListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].summary, Some("Test Meeting".to_string()));
        assert_eq!(
            response.items[0].start.value(),
            Some("2024-03-15T10:00:00-06:00")
        );
        assert_eq!(response.next_page_token.as_deref(), Some("page-2"));
    }

    #[test]
    fn parse_all_day_event() {
        let json = r#"{
            "id": "event1",
            "summary": "All Day Event",
            "start": { "date": "2024-03-15" },
            "end": { "date": "2024-03-16" }
        }"#;

        let event: ApiEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.start.value(), Some("2024-03-15"));
        assert_eq!(event.end.value(), Some("2024-03-16"));
    }

    #[test]
    fn parse_event_without_times() {
        let event: ApiEvent = serde_json::from_str(r#"{"id": "x", "status": "cancelled"}"#).unwrap();
        assert_eq!(event.start.value(), None);
        assert_eq!(event.status.as_deref(), Some("cancelled"));
    }

    #[test]
    fn empty_response_has_no_items() {
        let response: EventListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
        assert!(response.next_page_token.is_none());
    }
}

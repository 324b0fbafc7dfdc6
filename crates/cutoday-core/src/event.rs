//! Event types shared by every source.
//!
//! This module provides:
//! - [`EventSource`]: which adapter produced an event
//! - [`NormalizedEvent`]: the source-agnostic event representation served by the API

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{epoch, parse_event_date};

/// The adapter that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Public calendar feed (Google Calendar).
    Calendar,
    /// Grassroots organizing platform (Mobilize).
    Organizing,
    /// Uploaded flyer images from the local store.
    Image,
}

impl EventSource {
    /// Returns the wire name of this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Organizing => "organizing",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source-agnostic event.
///
/// Fields are private and set only through the builder methods, so an event
/// does not change once a provider has emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    id: String,
    summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    date: Option<String>,
    end_date: Option<String>,
    image: Option<String>,
    org: Option<String>,
    url: Option<String>,
    event_type: String,
    source: EventSource,
}

impl NormalizedEvent {
    /// Creates an event with the given source-local id.
    ///
    /// The stored id is qualified with the source name (`calendar-abc`), so
    /// ids from different sources never collide.
    pub fn new(source: EventSource, local_id: impl AsRef<str>, summary: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", source.as_str(), local_id.as_ref()),
            summary: summary.into(),
            description: None,
            date: None,
            end_date: None,
            image: None,
            org: None,
            url: None,
            event_type: String::new(),
            source,
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the start date string.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Builder method to set the end date string.
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Builder method to set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Builder method to set the sponsoring organization.
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Builder method to set the detail URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method to set the category.
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn source(&self) -> EventSource {
        self.source
    }

    /// Returns the instant used to order this event.
    ///
    /// Events without a date, or with one that does not parse, order as
    /// `1970-01-01T00:00:00Z` and therefore come first.
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.date
            .as_deref()
            .and_then(parse_event_date)
            .unwrap_or_else(epoch)
    }
}

/// Sorts events ascending by [`NormalizedEvent::sort_key`].
///
/// The sort is stable: events with equal keys keep their relative order.
pub fn sort_events(events: &mut [NormalizedEvent]) {
    events.sort_by_key(NormalizedEvent::sort_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(local_id: &str, date: Option<&str>) -> NormalizedEvent {
        let event = NormalizedEvent::new(EventSource::Calendar, local_id, local_id);
        match date {
            Some(d) => event.with_date(d),
            None => event,
        }
    }

    fn ids(events: &[NormalizedEvent]) -> Vec<&str> {
        events.iter().map(NormalizedEvent::id).collect()
    }

    #[test]
    fn source_wire_names() {
        assert_eq!(EventSource::Calendar.as_str(), "calendar");
        assert_eq!(EventSource::Organizing.to_string(), "organizing");
        assert_eq!(
            serde_json::to_string(&EventSource::Image).unwrap(),
            "\"image\""
        );
    }

    #[test]
    fn id_is_source_qualified() {
        let e = NormalizedEvent::new(EventSource::Organizing, "42-7", "Canvass");
        assert_eq!(e.id(), "organizing-42-7");
        assert_eq!(e.source(), EventSource::Organizing);
    }

    #[test]
    fn builder_sets_fields() {
        let e = NormalizedEvent::new(EventSource::Calendar, "abc", "Park cleanup")
            .with_description("Bring gloves")
            .with_date("2025-08-01T09:00:00Z")
            .with_end_date("2025-08-01T11:00:00Z")
            .with_org("Connect Utah Today")
            .with_url("https://calendar.google.com/event?eid=abc")
            .with_event_type("community");

        assert_eq!(e.summary(), "Park cleanup");
        assert_eq!(e.description(), Some("Bring gloves"));
        assert_eq!(e.date(), Some("2025-08-01T09:00:00Z"));
        assert_eq!(e.end_date(), Some("2025-08-01T11:00:00Z"));
        assert_eq!(e.image(), None);
        assert_eq!(e.org(), Some("Connect Utah Today"));
        assert_eq!(e.event_type(), "community");
    }

    #[test]
    fn sort_key_falls_back_to_epoch() {
        assert_eq!(event("a", None).sort_key(), epoch());
        assert_eq!(event("b", Some("not a date")).sort_key(), epoch());
        assert_eq!(
            event("c", Some("2025-08-01")).sort_key(),
            Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn sort_puts_undated_first() {
        let mut events = vec![
            event("late", Some("2025-09-01T00:00:00Z")),
            event("undated", None),
            event("early", Some("2025-08-01")),
            event("garbage", Some("soon")),
        ];
        sort_events(&mut events);
        assert_eq!(ids(&events), vec![
            "calendar-undated",
            "calendar-garbage",
            "calendar-early",
            "calendar-late"
        ]);
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        // Same instant written three different ways.
        let mut events = vec![
            event("first", Some("2025-08-15T10:00:00Z")),
            event("second", Some("2025-08-15T04:00:00-06:00")),
            event("before", Some("2025-08-14")),
            event("third", Some("2025-08-15T10:00:00.000Z")),
        ];
        sort_events(&mut events);
        assert_eq!(ids(&events), vec![
            "calendar-before",
            "calendar-first",
            "calendar-second",
            "calendar-third"
        ]);
    }

    #[test]
    fn wire_shape() {
        let e = NormalizedEvent::new(EventSource::Organizing, "12-34", "Voter registration drive")
            .with_description("Meet at the library")
            .with_date("2025-08-15T10:00:00.000Z")
            .with_end_date("2025-08-15T12:00:00.000Z")
            .with_image("https://example.org/flyer.png")
            .with_org("Utah Votes")
            .with_url("https://www.mobilize.us/utahvotes/event/12/")
            .with_event_type("VOTER_REG");

        insta::assert_json_snapshot!(e, @r#"
        {
          "id": "organizing-12-34",
          "summary": "Voter registration drive",
          "description": "Meet at the library",
          "date": "2025-08-15T10:00:00.000Z",
          "endDate": "2025-08-15T12:00:00.000Z",
          "image": "https://example.org/flyer.png",
          "org": "Utah Votes",
          "url": "https://www.mobilize.us/utahvotes/event/12/",
          "eventType": "VOTER_REG",
          "source": "organizing"
        }
        "#);
    }

    #[test]
    fn wire_shape_keeps_null_optionals() {
        let e = NormalizedEvent::new(EventSource::Image, "9", "");
        let json = serde_json::to_value(&e).unwrap();
        assert!(json["date"].is_null());
        assert!(json["image"].is_null());
        assert!(json.get("description").is_none());
        assert_eq!(json["source"], "image");
    }
}

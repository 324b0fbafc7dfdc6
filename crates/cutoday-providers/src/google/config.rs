//! Google Calendar provider configuration.

use std::time::Duration;

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// The public community calendar published by the site.
pub const DEFAULT_CALENDAR_ID: &str =
    "889b58a5eb5476990c478facc6e406cf64ca2d7ff73473cfa4b24f435b895d00@group.calendar.google.com";

/// Organization credited on calendar events, which carry no sponsor.
pub const DEFAULT_ORG_NAME: &str = "Connect Utah Today";

/// Category given to calendar events.
pub const DEFAULT_EVENT_TYPE: &str = "community";

/// Configuration for the Google Calendar provider.
///
/// The calendar is public, so an API key is enough; no OAuth flow is needed.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// API key sent as the `key` query parameter.
    ///
    /// When absent the provider serves an empty list instead of failing.
    pub api_key: Option<String>,

    /// Calendar to read.
    pub calendar_id: String,

    /// Organization name stamped on every event.
    pub org_name: String,

    /// Category stamped on every event.
    pub event_type: String,

    /// API base URL, overridable for tests and proxies.
    pub base_url: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Maximum number of result pages followed per fetch.
    pub max_pages: usize,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            org_name: DEFAULT_ORG_NAME.to_string(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            base_url: CALENDAR_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
            max_pages: 10,
        }
    }
}

impl GoogleConfig {
    /// Creates a configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Builder: set the API key (empty strings count as absent).
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Builder: set the calendar ID.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Builder: set the organization name.
    pub fn with_org_name(mut self, name: impl Into<String>) -> Self {
        self.org_name = name.into();
        self
    }

    /// Builder: set the event type.
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Builder: set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder: set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns true if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.calendar_id.trim().is_empty() {
            return Err("calendar_id is required".to_string());
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| format!("invalid base_url '{}': {}", self.base_url, e))?;
        if self.max_pages == 0 {
            return Err("max_pages must be at least 1".to_string());
        }
        Ok(())
    }
}

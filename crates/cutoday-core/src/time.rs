//! Time types for event queries.
//!
//! This module provides [`TimeWindow`] for defining query ranges,
//! [`WindowPolicy`] for resolving request bounds into a window, and the
//! date parsing used to order events.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of days covered by a window when a bound is missing.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Errors produced while building a [`TimeWindow`] from request input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// A bound could not be parsed as an ISO-8601 timestamp.
    #[error("invalid {field} value '{value}': expected an ISO-8601 timestamp")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
    },

    /// The start bound is after the end bound.
    #[error("timeMin ({start}) must not be after timeMax ({end})")]
    Inverted { start: String, end: String },

    /// Extending a single bound by the default span leaves the supported
    /// date range.
    #[error("{field} value '{value}' is out of range")]
    OutOfRange {
        field: &'static str,
        value: String,
    },
}

/// The instant used to order events that have no usable date.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Parses an event date string.
///
/// Accepts RFC 3339 timestamps (any offset, optional fractional seconds)
/// and bare `YYYY-MM-DD` dates, which are read as midnight UTC.
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Formats an instant as an ISO-8601 string with millisecond precision,
/// e.g. `2025-08-15T10:00:00.000Z`.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts epoch seconds to a UTC instant.
pub fn from_epoch_secs(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// A time window for querying events.
///
/// Represents a half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`. Use [`TimeWindow::try_new`] for
    /// untrusted input.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a new time window, rejecting an inverted range.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeError> {
        if start > end {
            return Err(TimeError::Inverted {
                start: format_timestamp(start),
                end: format_timestamp(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a time window from a start time and duration.
    pub fn from_duration(start: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(start, start + duration)
    }

    /// Checks if a datetime falls within this window.
    ///
    /// Uses half-open interval semantics: `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Start of the window in Unix seconds.
    pub fn start_epoch_secs(&self) -> i64 {
        self.start.timestamp()
    }

    /// End of the window in Unix seconds.
    pub fn end_epoch_secs(&self) -> i64 {
        self.end.timestamp()
    }
}

/// Resolves optional request bounds into a [`TimeWindow`].
///
/// The policy is built once at startup and shared by every endpoint, so all
/// sources see the same default window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    default_days: u32,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

impl WindowPolicy {
    /// Creates a policy whose default window spans `default_days` days.
    pub fn new(default_days: u32) -> Self {
        Self { default_days }
    }

    /// Returns the configured default span in days.
    pub fn default_days(&self) -> u32 {
        self.default_days
    }

    fn span(&self) -> Duration {
        Duration::days(i64::from(self.default_days))
    }

    /// Resolves the request bounds.
    ///
    /// - both bounds: `[time_min, time_max)`
    /// - only `time_min`: `[time_min, time_min + N days)`
    /// - only `time_max`: `[time_max - N days, time_max)`
    /// - neither: `[midnight UTC of now, + N days)`
    pub fn resolve(
        &self,
        time_min: Option<&str>,
        time_max: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TimeWindow, TimeError> {
        let start = time_min
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound("timeMin", s))
            .transpose()?;
        let end = time_max
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound("timeMax", s))
            .transpose()?;

        match (start, end) {
            (Some(start), Some(end)) => TimeWindow::try_new(start, end),
            (Some(start), None) => start
                .checked_add_signed(self.span())
                .map(|end| TimeWindow::new(start, end))
                .ok_or_else(|| out_of_range("timeMin", time_min)),
            (None, Some(end)) => end
                .checked_sub_signed(self.span())
                .map(|start| TimeWindow::new(start, end))
                .ok_or_else(|| out_of_range("timeMax", time_max)),
            (None, None) => {
                let today = now
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .map(|dt| dt.and_utc())
                    .unwrap_or(now);
                Ok(TimeWindow::from_duration(today, self.span()))
            }
        }
    }
}

fn parse_bound(field: &'static str, value: &str) -> Result<DateTime<Utc>, TimeError> {
    parse_event_date(value).ok_or_else(|| TimeError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

fn out_of_range(field: &'static str, value: Option<&str>) -> TimeError {
    TimeError::OutOfRange {
        field,
        value: value.unwrap_or_default().trim().to_string(),
    }
}

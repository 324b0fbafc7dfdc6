//! Google Calendar provider.
//!
//! Reads a public Google Calendar through the v3 REST API using an API key.
//! Recurring events are expanded server-side (`singleEvents=true`) and
//! returned in start order.

mod client;
mod config;
mod provider;

pub use config::{
    CALENDAR_API_BASE, DEFAULT_CALENDAR_ID, DEFAULT_EVENT_TYPE, DEFAULT_ORG_NAME, GoogleConfig,
};
pub use provider::GoogleProvider;

//! Mobilize organizing-events provider.
//!
//! Reads the public Mobilize v1 event feeds, filtered server-side to events
//! with a timeslot starting in the requested window, and expands each event
//! into one entry per matching timeslot.

mod client;
mod config;
mod provider;

pub use client::{ApiEvent, ApiSponsor, ApiTimeslot};
pub use config::{MOBILIZE_API_BASE, MobilizeConfig};
pub use provider::{MobilizeProvider, expand_event};

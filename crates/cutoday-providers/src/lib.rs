//! EventProvider trait, source adapters and the aggregator.
//!
//! - [`EventProvider`] - The trait every event source implements
//! - [`google::GoogleProvider`] - Public Google Calendar via API key
//! - [`mobilize::MobilizeProvider`] - Mobilize organizing events, one entry per timeslot
//! - [`Aggregator`] - Concurrent fan-out with per-source timeouts and partial-failure tolerance
//! - [`ProviderError`] - Error type shared by every adapter
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │ Google API   │  │ Mobilize API │  │ images table │
//! └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!        ▼                 ▼                 ▼
//!   GoogleProvider   MobilizeProvider   ImageProvider (cutoday-store)
//!        │                 │                 │
//!        └──────── EventProvider ────────────┘
//!                          │
//!                          ▼
//!                     Aggregator ──▶ sorted Vec<NormalizedEvent>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cutoday_providers::{Aggregator, mobilize::{MobilizeConfig, MobilizeProvider}};
//!
//! let aggregator = Aggregator::default()
//!     .with_provider(Arc::new(MobilizeProvider::new(MobilizeConfig::default())?));
//! let result = aggregator.aggregate(window).await?;
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
#[cfg(feature = "google")]
pub mod google;
#[cfg(any(feature = "google", feature = "mobilize"))]
mod http;
#[cfg(feature = "mobilize")]
pub mod mobilize;
pub mod provider;

pub use aggregate::{
    AggregateError, AggregateResult, Aggregator, DEFAULT_SOURCE_TIMEOUT, FailureReason,
    SourceFailure,
};
pub use error::{ProviderError, ProviderErrorKind, ProviderResult};
pub use filter::SponsorFilter;
pub use provider::{BoxFuture, ErrorProvider, EventProvider};

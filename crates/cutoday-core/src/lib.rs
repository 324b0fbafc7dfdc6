//! Core types: normalized events, time windows, tracing setup

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{EventSource, NormalizedEvent, sort_events};
pub use time::{
    DEFAULT_WINDOW_DAYS, TimeError, TimeWindow, WindowPolicy, epoch, format_timestamp,
    from_epoch_secs, parse_event_date,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

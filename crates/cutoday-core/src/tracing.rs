//! Log output for the HTTP services.
//!
//! Both binaries call [`init_tracing`] once before binding. `RUST_LOG`
//! always wins over the configured level.

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("unknown log format '{0}' (expected pretty, compact or json)")]
    UnknownFormat(String),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line, for a terminal.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// JSON lines, for log shippers.
    Json,
}

impl FromStr for TracingOutputFormat {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(TracingError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for the `cutoday*` and `tower_http` targets when `RUST_LOG`
    /// is unset.
    pub level: Level,
    pub format: TracingOutputFormat,
    /// Emit file and line of each event.
    pub source_location: bool,
    /// Emit a line when a span closes, which for `TraceLayer` spans carries
    /// the request latency.
    pub span_timing: bool,
    /// Explicit filter directive, replacing both `level` and `RUST_LOG`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingOutputFormat::Compact,
            source_location: false,
            span_timing: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// Production defaults: compact lines with request timing.
    #[must_use]
    pub fn server() -> Self {
        Self {
            span_timing: true,
            ..Self::default()
        }
    }

    /// Local development: everything at debug, pretty-printed.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: Level::DEBUG,
            format: TracingOutputFormat::Pretty,
            source_location: true,
            span_timing: true,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    fn default_directive(&self) -> String {
        format!("cutoday={0},tower_http={0}", self.level)
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match &self.filter {
            Some(directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the filter directive does
/// not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    let spans = if config.span_timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(spans);
    let output = match config.format {
        TracingOutputFormat::Pretty => base.pretty().boxed(),
        TracingOutputFormat::Compact => base.compact().boxed(),
        TracingOutputFormat::Json => base.json().with_current_span(true).boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(output).with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

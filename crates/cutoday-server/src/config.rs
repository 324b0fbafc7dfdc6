//! Server configuration.
//!
//! All settings live in a single `config.toml`, by default at
//! `~/.config/cutoday/config.toml`. Every section and field is optional.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 3000
//! default_window_days = 30
//!
//! [google]
//! api_key = "env::GOOGLECALENDAR_API_KEY"
//!
//! [mobilize]
//! organization_ids = [93]
//! sponsor_allow_list = ["Utah Votes"]
//! ```
//!
//! `api_key` supports secret references (see [`crate::secret`]).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cutoday_core::{DEFAULT_WINDOW_DAYS, TracingOutputFormat, WindowPolicy};
use cutoday_providers::google::{self, GoogleConfig};
use cutoday_providers::mobilize::{self, MobilizeConfig};

use crate::error::{ServerError, ServerResult};
use crate::secret;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CutodayConfig {
    pub server: ServerSettings,
    pub google: GoogleSettings,
    pub mobilize: MobilizeSettings,
    pub images: ImageSettings,
}

/// Listener, window and storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind.
    pub bind: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Length of the window used when a request leaves a bound open.
    pub default_window_days: u32,

    /// Per-source fetch timeout in seconds.
    pub source_timeout_secs: u64,

    /// SQLite database path. Defaults to the user data directory.
    pub database_path: Option<PathBuf>,

    /// Log output format: `pretty`, `compact` or `json`.
    pub log_format: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            default_window_days: DEFAULT_WINDOW_DAYS,
            source_timeout_secs: 10,
            database_path: None,
            log_format: "compact".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    pub fn window_policy(&self) -> WindowPolicy {
        WindowPolicy::new(self.default_window_days)
    }

    /// Returns the configured database path or the default one.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| CutodayConfig::default_data_dir().join("cutoday.db"))
    }

    pub fn log_format(&self) -> ServerResult<TracingOutputFormat> {
        self.log_format
            .parse()
            .map_err(|e| ServerError::config(format!("invalid log_format: {}", e)))
    }
}

/// Google Calendar source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Register the calendar source.
    pub enabled: bool,

    /// API key (supports `env::` and `file::` references).
    pub api_key: Option<String>,

    pub calendar_id: String,
    pub org_name: String,
    pub event_type: String,
    pub base_url: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            calendar_id: google::DEFAULT_CALENDAR_ID.to_string(),
            org_name: google::DEFAULT_ORG_NAME.to_string(),
            event_type: google::DEFAULT_EVENT_TYPE.to_string(),
            base_url: google::CALENDAR_API_BASE.to_string(),
        }
    }
}

impl GoogleSettings {
    /// Converts to provider configuration, resolving the API key reference.
    pub fn to_provider_config(&self, timeout: Duration) -> ServerResult<GoogleConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(secret::resolve)
            .transpose()
            .map_err(|e| ServerError::config(format!("google.api_key: {}", e)))?;

        Ok(GoogleConfig::default()
            .with_api_key(api_key)
            .with_calendar_id(&self.calendar_id)
            .with_org_name(&self.org_name)
            .with_event_type(&self.event_type)
            .with_base_url(&self.base_url)
            .with_timeout(timeout))
    }
}

/// Mobilize source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MobilizeSettings {
    /// Register the organizing source.
    pub enabled: bool,

    /// Organization feeds to read. Empty reads the global feed.
    pub organization_ids: Vec<u64>,

    /// Sponsor names to keep. Empty keeps all.
    pub sponsor_allow_list: Vec<String>,

    pub base_url: String,
}

impl Default for MobilizeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            organization_ids: Vec::new(),
            sponsor_allow_list: Vec::new(),
            base_url: mobilize::MOBILIZE_API_BASE.to_string(),
        }
    }
}

impl MobilizeSettings {
    pub fn to_provider_config(&self, timeout: Duration) -> MobilizeConfig {
        MobilizeConfig::default()
            .with_base_url(&self.base_url)
            .with_organization_ids(self.organization_ids.clone())
            .with_sponsor_allow_list(self.sponsor_allow_list.clone())
            .with_timeout(timeout)
    }
}

/// Uploaded-image source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Register the image source.
    pub enabled: bool,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl CutodayConfig {
    /// Loads configuration from `path`, or from the default path.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ServerResult<Self> {
        toml::from_str(content).map_err(|e| ServerError::config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cutoday")
            .join("config.toml")
    }

    /// Returns the default data directory.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cutoday")
    }
}

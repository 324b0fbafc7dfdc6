//! Mobilize provider configuration.

use std::time::Duration;

use crate::filter::SponsorFilter;

/// Base URL for the public Mobilize v1 API.
pub const MOBILIZE_API_BASE: &str = "https://api.mobilize.us/v1";

/// Configuration for the Mobilize organizing-events provider.
#[derive(Debug, Clone)]
pub struct MobilizeConfig {
    /// API base URL.
    pub base_url: String,

    /// Organizations whose event feeds are read. Empty reads the global feed.
    pub organization_ids: Vec<u64>,

    /// Sponsor names to keep. Empty keeps every sponsor.
    pub sponsor_allow_list: Vec<String>,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Maximum number of `next` links followed per feed.
    pub max_pages: usize,
}

impl Default for MobilizeConfig {
    fn default() -> Self {
        Self {
            base_url: MOBILIZE_API_BASE.to_string(),
            organization_ids: Vec::new(),
            sponsor_allow_list: Vec::new(),
            timeout: Duration::from_secs(10),
            max_pages: 20,
        }
    }
}

impl MobilizeConfig {
    /// Builder: set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder: set the organization feeds to read.
    pub fn with_organization_ids(mut self, ids: Vec<u64>) -> Self {
        self.organization_ids = ids;
        self
    }

    /// Builder: set the sponsor allow-list.
    pub fn with_sponsor_allow_list(mut self, names: Vec<String>) -> Self {
        self.sponsor_allow_list = names;
        self
    }

    /// Builder: set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set the page limit.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Builds the sponsor filter from the allow-list.
    pub fn sponsor_filter(&self) -> SponsorFilter {
        SponsorFilter::new(self.sponsor_allow_list.iter().cloned())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.base_url)
            .map_err(|e| format!("invalid base_url '{}': {}", self.base_url, e))?;
        if self.max_pages == 0 {
            return Err("max_pages must be at least 1".to_string());
        }
        Ok(())
    }
}

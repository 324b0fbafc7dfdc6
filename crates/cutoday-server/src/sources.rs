//! Builds the event sources named in the configuration.

use std::sync::Arc;

use tracing::{error, info, warn};

use cutoday_core::EventSource;
use cutoday_providers::google::GoogleProvider;
use cutoday_providers::mobilize::MobilizeProvider;
use cutoday_providers::{Aggregator, ErrorProvider, ProviderError};
use cutoday_store::{ImageProvider, Store};

use crate::config::CutodayConfig;

/// Registers every enabled source in a fixed order: calendar, organizing,
/// images.
///
/// A source whose settings cannot be turned into a provider is registered as
/// an [`ErrorProvider`], so its endpoint reports the problem and the others
/// keep working.
pub fn build_aggregator(config: &CutodayConfig, store: &Store) -> Aggregator {
    let timeout = config.server.source_timeout();
    let mut aggregator = Aggregator::new(timeout);

    if config.google.enabled {
        let provider = config
            .google
            .to_provider_config(timeout)
            .map_err(|e| ProviderError::configuration_missing(e.to_string()))
            .and_then(GoogleProvider::new);
        match provider {
            Ok(provider) => {
                if !provider.config().has_api_key() {
                    warn!("Google Calendar source has no API key; it will serve no events");
                }
                aggregator.register(Arc::new(provider));
            }
            Err(e) => {
                error!(error = %e, "invalid Google Calendar configuration");
                aggregator.register(Arc::new(ErrorProvider::new("google", EventSource::Calendar, e)));
            }
        }
    }

    if config.mobilize.enabled {
        match MobilizeProvider::new(config.mobilize.to_provider_config(timeout)) {
            Ok(provider) => aggregator.register(Arc::new(provider)),
            Err(e) => {
                error!(error = %e, "invalid Mobilize configuration");
                aggregator.register(Arc::new(ErrorProvider::new(
                    "mobilize",
                    EventSource::Organizing,
                    e,
                )));
            }
        }
    }

    if config.images.enabled {
        aggregator.register(Arc::new(ImageProvider::new(store.clone())));
    }

    info!(providers = aggregator.providers().len(), "event sources ready");
    aggregator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CutodayConfig;

    fn sources(aggregator: &Aggregator) -> Vec<EventSource> {
        aggregator.providers().iter().map(|p| p.source()).collect()
    }

    #[test]
    fn default_config_registers_all_sources() {
        let store = Store::open_in_memory().unwrap();
        let aggregator = build_aggregator(&CutodayConfig::default(), &store);
        assert_eq!(
            sources(&aggregator),
            vec![EventSource::Calendar, EventSource::Organizing, EventSource::Image]
        );
    }

    #[test]
    fn disabled_sources_are_skipped() {
        let store = Store::open_in_memory().unwrap();
        let config = CutodayConfig::parse("[google]\nenabled = false\n[images]\nenabled = false").unwrap();
        let aggregator = build_aggregator(&config, &store);
        assert_eq!(sources(&aggregator), vec![EventSource::Organizing]);
    }

    #[tokio::test]
    async fn invalid_source_registers_error_provider() {
        let store = Store::open_in_memory().unwrap();
        let config = CutodayConfig::parse("[mobilize]\nbase_url = \"not a url\"").unwrap();
        let aggregator = build_aggregator(&config, &store);
        assert!(aggregator.has_source(EventSource::Organizing));

        let window = cutoday_core::WindowPolicy::default()
            .resolve(None, None, chrono::Utc::now())
            .unwrap();
        let err = aggregator
            .fetch_source(EventSource::Organizing, window)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }
}

//! Shared request state.

use std::sync::Arc;

use cutoday_core::WindowPolicy;
use cutoday_providers::Aggregator;
use cutoday_store::Store;

/// State handed to every handler. Immutable after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub store: Store,
    pub window_policy: WindowPolicy,
}

impl AppState {
    pub fn new(aggregator: Aggregator, store: Store, window_policy: WindowPolicy) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            store,
            window_policy,
        }
    }
}

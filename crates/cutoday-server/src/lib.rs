//! ConnectUtahToday HTTP API.
//!
//! This crate wires the event sources, the SQLite store and the axum router
//! into one service:
//! - Per-source event endpoints and the merged `/api/all-events`
//! - Organizations, opportunities and image records backed by SQLite
//! - `config.toml` loading with secret references
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Example
//!
//! ```rust,no_run
//! use cutoday_server::{CutodayConfig, serve};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CutodayConfig::load(None)?;
//!     serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
mod error;
pub mod secret;
mod signals;
mod sources;
mod state;

use tokio::net::TcpListener;
use tracing::info;

use cutoday_store::Store;

pub use config::CutodayConfig;
pub use error::{ServerError, ServerResult};
pub use signals::{ShutdownSignal, SignalHandler};
pub use sources::build_aggregator;
pub use state::AppState;

/// Opens the store, registers the sources and serves until a shutdown
/// signal arrives.
pub async fn serve(config: CutodayConfig) -> ServerResult<()> {
    let db_path = config.server.database_path();
    let store = Store::open(&db_path)?;
    let aggregator = build_aggregator(&config, &store);
    let state = AppState::new(aggregator, store, config.server.window_policy());

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        database = %db_path.display(),
        window_days = config.server.default_window_days,
        "server listening"
    );

    let signals = SignalHandler::new();
    signals.spawn_listener()?;

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(signals.shutdown().wait())
        .await?;

    info!("server stopped");
    Ok(())
}

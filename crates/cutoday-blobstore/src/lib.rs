//! Blob upload/download proxy for event flyers.
//!
//! Browsers upload images with `POST /upload` and read them back with
//! `GET /{key}`. The returned URL is what the main API stores in its image
//! records.

pub mod cli;
mod error;
pub mod routes;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

pub use error::{BlobError, BlobResult};
pub use routes::{BlobState, DEFAULT_MAX_UPLOAD_BYTES, router};
pub use store::{BlobStore, FsBlobStore, StoredObject};

/// Serves the proxy until SIGINT or SIGTERM.
pub async fn serve(
    addr: SocketAddr,
    store: Arc<dyn BlobStore>,
    public_base_url: String,
    max_upload_bytes: usize,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, public_base_url = %public_base_url, "blob proxy listening");

    let app = router(BlobState::new(store, public_base_url), max_upload_bytes);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("blob proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

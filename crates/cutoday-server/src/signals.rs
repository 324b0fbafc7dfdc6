//! Shutdown on SIGTERM or SIGINT.
//!
//! The listener stops accepting connections and in-flight requests are
//! allowed to finish.

use std::io;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

/// Turns OS termination signals into a shutdown flag that any number of
/// tasks can wait on.
#[derive(Clone)]
pub struct SignalHandler {
    stop: Arc<watch::Sender<bool>>,
}

impl SignalHandler {
    pub fn new() -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            stop: Arc::new(stop),
        }
    }

    /// Installs the OS handlers and spawns a task that flips the flag on the
    /// first signal.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler cannot be installed.
    pub fn spawn_listener(&self) -> io::Result<()> {
        let received = termination()?;
        let handler = self.clone();
        tokio::spawn(async move {
            let name = received.await;
            info!(signal = name, "shutting down");
            handler.trigger_shutdown();
            debug!("signal listener stopped");
        });
        Ok(())
    }

    /// Returns a future that completes once shutdown is signaled.
    pub fn shutdown(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.stop.subscribe(),
        }
    }

    pub fn is_shutdown(&self) -> bool {
        *self.stop.borrow()
    }

    /// Flags shutdown without an OS signal.
    pub fn trigger_shutdown(&self) {
        self.stop.send_replace(true);
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers the handlers up front so installation errors surface at
/// startup, then resolves to the name of the first signal received.
#[cfg(unix)]
fn termination() -> io::Result<impl Future<Output = &'static str> + Send + 'static> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;
    Ok(async move {
        tokio::select! {
            _ = term.recv() => "SIGTERM",
            _ = int.recv() => "SIGINT",
        }
    })
}

#[cfg(not(unix))]
fn termination() -> io::Result<impl Future<Output = &'static str> + Send + 'static> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "ctrl-c",
            Err(_) => std::future::pending().await,
        }
    })
}

/// Completes when shutdown is signaled.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub async fn wait(mut self) {
        // Also returns if every handler clone is dropped.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_sets_flag() {
        let handler = SignalHandler::new();
        assert!(!handler.is_shutdown());
        handler.trigger_shutdown();
        assert!(handler.is_shutdown());
    }

    #[tokio::test]
    async fn waiters_wake_on_trigger() {
        let handler = SignalHandler::new();
        let first = tokio::spawn(handler.shutdown().wait());
        let second = tokio::spawn(handler.shutdown().wait());
        tokio::time::sleep(Duration::from_millis(10)).await;
        handler.trigger_shutdown();

        let both = async {
            first.await.unwrap();
            second.await.unwrap();
        };
        assert!(tokio::time::timeout(Duration::from_millis(200), both).await.is_ok());
    }

    #[tokio::test]
    async fn late_waiter_sees_earlier_trigger() {
        let handler = SignalHandler::new();
        handler.trigger_shutdown();
        let result = tokio::time::timeout(Duration::from_millis(50), handler.shutdown().wait()).await;
        assert!(result.is_ok());
    }
}

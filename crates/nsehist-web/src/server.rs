//! Server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use nsehist_lib::{Pacing, SnapshotSource};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::routes::{AppState, router};
use crate::session::SessionStore;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// How often idle sessions are swept.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Errors that stop the server.
#[derive(Error, Debug)]
pub enum WebError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Server settings.
#[derive(Debug, Clone, Copy)]
pub struct WebConfig {
    /// Listen address.
    pub bind: SocketAddr,
    /// Pause schedule for every download.
    pub pacing: Pacing,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            pacing: Pacing::web_default(),
        }
    }
}

/// Serves the downloader until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: WebConfig, source: Arc<dyn SnapshotSource>) -> Result<(), WebError> {
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| WebError::Bind {
            addr: config.bind,
            source,
        })?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "web server listening");

    let state = AppState::new(source, config.pacing);
    let sweeper = spawn_sweeper(state.sessions().clone(), SWEEP_INTERVAL);
    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served?;

    tracing::info!("web server stopped");
    Ok(())
}

/// Evicts idle sessions from `sessions` every `period`.
pub fn spawn_sweeper(sessions: SessionStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(period);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            let removed = sessions.sweep().await;
            if removed > 0 {
                tracing::info!(removed, "swept idle sessions");
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WebConfig::default();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.pacing, Pacing::web_default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_abandoned_sessions() {
        let sessions = SessionStore::with_limits(Duration::from_secs(60), 16);
        for _ in 0..3 {
            sessions.get_or_create(None).await;
        }
        let sweeper = spawn_sweeper(sessions.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(sessions.len().await, 3);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(sessions.is_empty().await);
        sweeper.abort();
    }
}

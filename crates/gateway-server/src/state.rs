//! Shared application state.

use gateway_client::LmStudioClient;
use gateway_config::GatewayConfig;
use std::sync::Arc;
use std::time::Instant;

/// State shared by all request handlers.
///
/// Everything in here is read-only after startup, so clones are cheap and no
/// locking is needed.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide configuration.
    pub config: Arc<GatewayConfig>,
    /// Client for the model server.
    pub client: Arc<LmStudioClient>,
    /// When the process started, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Build the state from the resolved configuration and client.
    #[must_use]
    pub fn new(config: Arc<GatewayConfig>, client: Arc<LmStudioClient>) -> Self {
        Self {
            config,
            client,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the process started.
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

//! # LM Studio Gateway
//!
//! Minimal HTTP gateway that forwards chat-completion requests to a locally
//! hosted, OpenAI-compatible model server (LM Studio) and exposes
//! health/status endpoints.
//!
//! ## Usage
//!
//! ```bash
//! # Start with default configuration (LM Studio on localhost:1234)
//! lmstudio-gateway
//!
//! # Point at another server and model
//! LM_STUDIO_API_URL=http://10.0.0.5:1234 LM_STUDIO_MODEL=mistral-7b lmstudio-gateway
//! ```

use gateway_client::LmStudioClient;
use gateway_config::GatewayConfig;
use gateway_server::{create_router, shutdown_signal, AppState};
use gateway_telemetry::init_logging;
use std::sync::Arc;
use tracing::{error, info};

/// Application entry point
#[tokio::main]
async fn main() {
    // Configuration is validated eagerly; nothing else starts on bad input.
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("failed to initialize logging: {e}");
    }

    info!(
        version = %config.version,
        environment = %config.environment,
        "starting LM Studio gateway"
    );

    if let Err(e) = run(config).await {
        error!(error = %e, "gateway failed");
        std::process::exit(1);
    }
}

/// Main application logic
async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = LmStudioClient::new(&config.lm_studio)?;

    info!(
        model_server = %config.lm_studio.base_url,
        default_model = ?config.lm_studio.default_model,
        "model-server client ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let api_prefix = config.api_prefix.clone();

    let state = AppState::new(Arc::new(config), Arc::new(client));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, api_prefix = %api_prefix, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server closed");
    Ok(())
}

//! HTTP request handlers for the gateway API.

use axum::extract::State;
use axum::http::Uri;
use axum::Json;
use chrono::Utc;
use gateway_core::{ChatRequest, ChatResponse};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status; always `ok` while the process is alive.
    pub status: String,
    /// Current time, RFC 3339.
    pub timestamp: String,
    /// Seconds since the process started.
    pub uptime_seconds: u64,
    /// Deployment environment.
    pub environment: String,
    /// Application version.
    pub version: String,
}

/// API namespace index response.
#[derive(Debug, Serialize)]
pub struct ApiIndexResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable status line.
    pub message: String,
    /// Application version.
    pub version: String,
}

/// Model listing response.
#[derive(Debug, Serialize)]
pub struct ModelsListing {
    /// Model identifiers, in upstream order.
    pub models: Vec<String>,
}

/// Health check endpoint. Succeeds whenever the process is alive; upstream
/// connectivity is deliberately not probed here.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
        environment: state.config.environment.to_string(),
        version: state.config.version.clone(),
    })
}

/// API namespace index.
pub async fn api_index(State(state): State<AppState>) -> Json<ApiIndexResponse> {
    Json(ApiIndexResponse {
        success: true,
        message: "API is running".to_string(),
        version: state.config.version.clone(),
    })
}

/// Chat completion endpoint: forwards the request through the model-server
/// client and returns the upstream response verbatim.
#[instrument(skip(state, body), fields(model = ?body.model))]
pub async fn chat_completion(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if body.messages.is_empty() {
        return Err(ApiError::bad_request("messages must not be empty"));
    }

    debug!(messages = body.messages.len(), "forwarding chat completion");

    let expose_detail = !state.config.environment.is_production();
    let response = state
        .client
        .chat(&body)
        .await
        .map_err(|e| ApiError::from_gateway(&e, expose_detail))?;

    Ok(Json(response))
}

/// Model listing endpoint.
#[instrument(skip(state))]
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsListing>, ApiError> {
    let expose_detail = !state.config.environment.is_production();
    let models = state
        .client
        .list_models()
        .await
        .map_err(|e| ApiError::from_gateway(&e, expose_detail))?;

    Ok(Json(ModelsListing { models }))
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}

//! Route definitions for the gateway API.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Request bodies larger than this are rejected.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Create the main router: the health endpoint at the root, the API
/// namespace under the configured prefix, and a JSON 404 for everything
/// else.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(handlers::api_index))
        .route("/chat", post(handlers::chat_completion))
        .route("/models", get(handlers::list_models));

    Router::new()
        .route("/health", get(handlers::health_check))
        // `nest` registers the inner "/" route at the bare prefix only, so the
        // spec-mandated `GET {api_prefix}/` form needs its own registration.
        .route(
            &format!("{}/", state.config.api_prefix),
            get(handlers::api_index),
        )
        .nest(&state.config.api_prefix, api)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

/// CORS policy from configuration: one allowed origin, GET/POST, JSON and
/// auth headers.
fn cors_layer(state: &AppState) -> CorsLayer {
    let cors = &state.config.cors;

    let mut layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if let Ok(origin) = cors.origin.parse::<HeaderValue>() {
        layer = layer.allow_origin(origin);
    }
    if cors.credentials {
        layer = layer.allow_credentials(true);
    }
    layer
}

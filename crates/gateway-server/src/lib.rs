//! # Gateway Server
//!
//! HTTP surface for the LM Studio gateway.
//!
//! This crate provides:
//! - Axum router with the health endpoint and the API namespace
//! - Request handlers that forward through the model-server client
//! - A uniform JSON error envelope for all endpoints
//! - Graceful shutdown handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod handlers;
pub mod routes;
pub mod shutdown;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use routes::create_router;
pub use shutdown::shutdown_signal;
pub use state::AppState;

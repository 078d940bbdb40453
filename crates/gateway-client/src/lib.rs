//! # Gateway Client
//!
//! Outbound client for the LM Studio model server.
//!
//! [`LmStudioClient`] translates application-level chat and model-listing
//! requests into calls against the server's OpenAI-compatible API, applies
//! the configured defaults, and maps failures into [`GatewayError`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;

pub use client::{LmStudioClient, FALLBACK_MODEL};
pub use error::{GatewayError, GatewayResult};

//! # Gateway Core
//!
//! Wire contracts shared between the LM Studio gateway's HTTP surface and
//! its outbound model-server client:
//! - Chat request and message types
//! - Chat completion response types
//! - Model listing types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::{ChatMessage, ChatRequest, MessageRole};
pub use response::{ChatResponse, Choice, CompletionMessage, ModelEntry, ModelsResponse, Usage};

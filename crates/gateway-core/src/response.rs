//! Response types for the gateway.
//!
//! These match the OpenAI-compatible bodies LM Studio returns. The gateway
//! passes them through to callers without reshaping, so every type derives
//! both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};

/// Response from a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions, in upstream order.
    pub choices: Vec<Choice>,
    /// Token usage counters. Defaults to zeroes when upstream omits them.
    #[serde(default)]
    pub usage: Usage,
}

impl ChatResponse {
    /// Content of the first choice, or the empty string if there are none.
    #[must_use]
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .map_or("", |c| c.message.content.as_str())
    }

    /// The first choice, if any.
    #[must_use]
    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }

    /// Total tokens consumed by the exchange.
    #[must_use]
    pub fn total_tokens(&self) -> u32 {
        self.usage.total_tokens
    }
}

/// A single candidate completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: CompletionMessage,
    /// Why generation stopped (e.g. `stop`, `length`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The generated message inside a choice.
///
/// The role comes back as a plain string so that whatever the model server
/// reports is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    /// Role reported by the model server (normally `assistant`).
    pub role: String,
    /// Generated text.
    pub content: String,
}

/// Token usage counters for one exchange.
///
/// `total_tokens` should equal `prompt_tokens + completion_tokens`; the
/// gateway trusts the upstream server and does not enforce this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens for the exchange.
    pub total_tokens: u32,
}

/// Wire shape of `GET /v1/models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Models known to the server, in upstream order.
    pub data: Vec<ModelEntry>,
}

/// One entry in the models listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model identifier.
    pub id: String,
}

//! Error types for the model-server client.

use thiserror::Error;

/// Result type for client operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Failures from a call to the model server.
///
/// Neither kind is retried by this layer; the caller decides whether to
/// retry.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The model server answered with a non-2xx status.
    #[error("model server returned HTTP {status}: {body}")]
    UpstreamHttp {
        /// HTTP status code from the model server.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// The call could not complete: connection failure, timeout, or an
    /// unparseable response body.
    #[error("model server request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GatewayError {
    /// Status code of the upstream response, for upstream HTTP failures.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamHttp { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    /// Whether this failure happened below the HTTP layer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

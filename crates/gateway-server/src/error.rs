//! Uniform JSON error envelope for the API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gateway_client::GatewayError;
use serde::Serialize;
use tracing::{debug, error};

/// An error ready to be rendered as the gateway's JSON envelope:
/// `{"success": false, "error": {"message", "detail"?}}`.
///
/// `detail` carries the internal failure text and is only populated outside
/// production.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    /// Create an error with the given status and message.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Attach internal detail, shown only when `expose` is set.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>, expose: bool) -> Self {
        if expose {
            self.detail = Some(detail.into());
        }
        self
    }

    /// Map a model-server failure into the envelope.
    ///
    /// Both upstream HTTP errors and transport failures surface as
    /// 502 Bad Gateway; `expose_detail` controls whether the internal
    /// failure text is included.
    #[must_use]
    pub fn from_gateway(err: &GatewayError, expose_detail: bool) -> Self {
        let message = match err {
            GatewayError::UpstreamHttp { status, .. } => {
                format!("model server returned HTTP {status}")
            }
            GatewayError::Transport(_) => "model server request failed".to_string(),
        };
        Self::new(StatusCode::BAD_GATEWAY, message).with_detail(err.to_string(), expose_detail)
    }

    /// The HTTP status this error renders with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), message = %self.message, "request failed");
        } else {
            debug!(status = self.status.as_u16(), message = %self.message, "request rejected");
        }

        let envelope = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                message: self.message,
                detail: self.detail,
            },
        };
        (self.status, Json(envelope)).into_response()
    }
}

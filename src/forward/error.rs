//! Forwarding failures and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body written to the caller for every forwarding failure.
pub const FORWARD_FAILED: &str = "Failed to forward request";

/// Errors that end a forwarded request before any upstream byte is relayed.
///
/// Failures while streaming the upstream body are not represented here: the
/// status line is already committed by then, so they are only logged.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The inbound body could not be read.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    /// The outbound request could not be constructed.
    #[error("failed to build outbound request: {0}")]
    BuildRequest(String),

    /// The outbound call failed at the transport level.
    #[error("upstream request failed: {0}")]
    Transport(#[source] tower::BoxError),
}

impl ForwardError {
    /// Local failures are 500, transport failures 502.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::BodyRead(_) | ForwardError::BuildRequest(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ForwardError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ForwardError::BodyRead(_) => "body_error",
            ForwardError::BuildRequest(_) => "build_error",
            ForwardError::Transport(_) => "transport_error",
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (self.status(), FORWARD_FAILED).into_response()
    }
}

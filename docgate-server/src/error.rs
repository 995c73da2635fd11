//! Per-request failures and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docgate::MdxParseError;
use thiserror::Error;

/// Everything a handler can fail with. Bodies are plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Only POST is supported")]
    MethodNotAllowed,

    #[error("MDX parse failure: {0}")]
    MdxParse(#[from] MdxParseError),

    #[error("Request body is not valid UTF-8")]
    InvalidUtf8,

    #[error("Request timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidUtf8 => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::MdxParse(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }
        (self.status(), self.to_string()).into_response()
    }
}

//! Client-facing error taxonomy.
//!
//! Every failure a route can produce ends up as a `GatewayError` and is
//! rendered as `{error, message, success: false, details?}` with a fixed
//! status code. Nothing escapes the route boundary in any other form.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Gateway-wide error types.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid request format: {0}")]
    InvalidRequestFormat(String),

    /// Inbound body larger than `limits.max_body_bytes`.
    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Request timeout after {0:?}")]
    RequestTimeout(std::time::Duration),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),

    /// Backend answered with a non-2xx status on a route that interprets the body.
    #[error("Backend returned {status}")]
    BackendError { status: StatusCode, details: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Wire shape of every error returned to the client.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequestFormat(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::RequestTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::ConnectionFailed(_) => StatusCode::BAD_GATEWAY,
            GatewayError::InvalidUpstreamResponse(_) => StatusCode::BAD_GATEWAY,
            // Upstream 5xx must not be confused with the gateway's own 5xx codes.
            GatewayError::BackendError { status, .. } if status.is_server_error() => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::BackendError { status, .. } => *status,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequestFormat(_) => "INVALID_REQUEST_FORMAT",
            GatewayError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            GatewayError::RequestTimeout(_) => "REQUEST_TIMEOUT",
            GatewayError::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            GatewayError::ConnectionFailed(_) => "CONNECTION_FAILED",
            GatewayError::InvalidUpstreamResponse(_) => "INVALID_UPSTREAM_RESPONSE",
            GatewayError::BackendError { .. } => "BACKEND_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Human-readable message safe to show on the kiosk.
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::InvalidRequestFormat(guidance) => guidance.clone(),
            GatewayError::PayloadTooLarge(_) => "Request body too large".to_string(),
            GatewayError::RequestTimeout(_) => "Request timeout".to_string(),
            GatewayError::BackendUnavailable(_) => "Backend service unavailable".to_string(),
            GatewayError::ConnectionFailed(_) => "Failed to connect to backend".to_string(),
            GatewayError::InvalidUpstreamResponse(_) => {
                "Backend returned an invalid response".to_string()
            }
            GatewayError::BackendError { status, .. } => {
                format!("Backend returned status {}", status.as_u16())
            }
            GatewayError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Diagnostic detail forwarded to the client, if any.
    ///
    /// Internal failures keep their cause server-side.
    pub fn details(&self) -> Option<String> {
        match self {
            GatewayError::InvalidRequestFormat(_) | GatewayError::Internal(_) => None,
            GatewayError::PayloadTooLarge(limit) => {
                Some(format!("Body exceeds the {} byte limit", limit))
            }
            GatewayError::RequestTimeout(deadline) => {
                Some(format!("No response within {}ms", deadline.as_millis()))
            }
            GatewayError::BackendUnavailable(cause)
            | GatewayError::ConnectionFailed(cause)
            | GatewayError::InvalidUpstreamResponse(cause) => Some(cause.clone()),
            GatewayError::BackendError { details, .. } if details.is_empty() => None,
            GatewayError::BackendError { details, .. } => Some(details.clone()),
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.error_code(),
            message: Some(self.client_message()),
            success: false,
            details: self.details(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

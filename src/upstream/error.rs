//! Structured upstream failures and their classification.
//!
//! The HTTP client reports failures as an opaque error chain. This module
//! turns that chain into a closed set of kinds by inspecting the client's
//! connect flag and the `std::io::ErrorKind` of any I/O error in the chain,
//! then maps each kind onto the client-facing taxonomy.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::error::GatewayError;

/// Why an outbound call did not produce a response.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The route deadline fired before the backend answered.
    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),

    /// The backend host actively refused the TCP connection.
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// Any other transport-level failure (DNS, reset, protocol error, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The outbound request could not be built; nothing was sent.
    #[error("invalid outbound request: {0}")]
    InvalidRequest(String),
}

impl UpstreamError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::ConnectionRefused(_) => "connection_refused",
            UpstreamError::Network(_) => "network",
            UpstreamError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Classify a failure from the HTTP client.
    pub fn from_client_error(err: &hyper_util::client::legacy::Error) -> Self {
        let description = error_chain(err);
        if err.is_connect() && io_error_kind(err) == Some(io::ErrorKind::ConnectionRefused) {
            return UpstreamError::ConnectionRefused(description);
        }
        UpstreamError::Network(description)
    }

    /// Classify a failure while reading the response body.
    pub fn from_body_error(err: &(dyn StdError + 'static)) -> Self {
        UpstreamError::Network(error_chain(err))
    }
}

impl From<UpstreamError> for GatewayError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout(deadline) => GatewayError::RequestTimeout(deadline),
            UpstreamError::ConnectionRefused(cause) => GatewayError::BackendUnavailable(cause),
            UpstreamError::Network(cause) => GatewayError::ConnectionFailed(cause),
            UpstreamError::InvalidRequest(cause) => GatewayError::Internal(cause),
        }
    }
}

/// First `io::ErrorKind` found walking the source chain.
fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = e.source();
    }
    None
}

/// Render the error and all of its sources as one line.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        out.push_str(": ");
        out.push_str(&e.to_string());
        current = e.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("tcp connect error")]
    struct Wrapper(#[source] io::Error);

    #[test]
    fn test_io_kind_found_in_chain() {
        let err = Wrapper(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert_eq!(io_error_kind(&err), Some(io::ErrorKind::ConnectionRefused));
        assert_eq!(error_chain(&err), "tcp connect error: refused");
    }

    #[test]
    fn test_classification_to_gateway_errors() {
        let timeout: GatewayError = UpstreamError::Timeout(Duration::from_millis(30_000)).into();
        assert_eq!(timeout.status_code().as_u16(), 504);

        let refused: GatewayError = UpstreamError::ConnectionRefused("x".into()).into();
        assert_eq!(refused.error_code(), "BACKEND_UNAVAILABLE");

        let network: GatewayError = UpstreamError::Network("reset".into()).into();
        assert_eq!(network.status_code().as_u16(), 502);

        let internal: GatewayError = UpstreamError::InvalidRequest("bad uri".into()).into();
        assert_eq!(internal.status_code().as_u16(), 500);
    }
}

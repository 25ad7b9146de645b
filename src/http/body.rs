//! Body codec for forwarded requests.
//!
//! # Responsibilities
//! - Pick a body strategy once per request from method and content type
//! - Buffer the inbound body in the form the strategy dictates
//! - Degrade to "no body" when the stream breaks
//! - Reject bodies over the configured limit with 413
//!
//! # Design Decisions
//! - GET/HEAD never read the inbound stream
//! - Multipart payloads are opaque bytes; re-encoding would break boundaries
//! - A broken stream is logged and forwarded without a body instead of
//!   failing the request; an oversized one is never truncated or dropped

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method};
use axum::BoxError;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::error::GatewayError;

/// True when the content type names a multipart form.
pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("multipart/form-data"))
}

/// Buffer `body`, failing once more than `limit` bytes arrive.
pub async fn read_limited(body: Body, limit: usize) -> Result<Bytes, BoxError> {
    Ok(Limited::new(body, limit).collect().await?.to_bytes())
}

/// Whether a [`read_limited`] failure was the size limit rather than the stream.
pub fn is_length_limit(err: &BoxError) -> bool {
    err.is::<LengthLimitError>()
}

/// How the inbound body will be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStrategy {
    NoBody,
    Text,
    Binary,
}

impl BodyStrategy {
    pub fn select(method: &Method, headers: &HeaderMap) -> Self {
        if *method == Method::GET || *method == Method::HEAD {
            return BodyStrategy::NoBody;
        }
        if is_multipart(headers) {
            BodyStrategy::Binary
        } else {
            BodyStrategy::Text
        }
    }
}

/// The payload that will be sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardBody {
    NoBody,
    TextBody(String),
    BinaryBody(Bytes),
}

impl ForwardBody {
    pub fn len(&self) -> usize {
        match self {
            ForwardBody::NoBody => 0,
            ForwardBody::TextBody(text) => text.len(),
            ForwardBody::BinaryBody(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ForwardBody::NoBody)
    }

    pub fn into_body(self) -> Body {
        match self {
            ForwardBody::NoBody => Body::empty(),
            ForwardBody::TextBody(text) => Body::from(text),
            ForwardBody::BinaryBody(bytes) => Body::from(bytes),
        }
    }
}

/// Read `body` according to the strategy chosen for `method` and `headers`.
///
/// Bodies larger than `limit` fail with `PayloadTooLarge`.
pub async fn read_forward_body(
    method: &Method,
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> Result<ForwardBody, GatewayError> {
    let strategy = BodyStrategy::select(method, headers);
    if strategy == BodyStrategy::NoBody {
        return Ok(ForwardBody::NoBody);
    }

    let bytes = match read_limited(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) if is_length_limit(&e) => {
            tracing::warn!(method = %method, limit, "Request body over limit");
            return Err(GatewayError::PayloadTooLarge(limit));
        }
        Err(e) => {
            tracing::warn!(
                method = %method,
                error = %e,
                "Failed to read request body, forwarding without body"
            );
            return Ok(ForwardBody::NoBody);
        }
    };

    Ok(match strategy {
        BodyStrategy::Binary => ForwardBody::BinaryBody(bytes),
        BodyStrategy::Text => ForwardBody::TextBody(String::from_utf8_lossy(&bytes).into_owned()),
        BodyStrategy::NoBody => ForwardBody::NoBody,
    })
}

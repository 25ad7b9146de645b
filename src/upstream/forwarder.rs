//! Outbound calls to the backend service.
//!
//! # Responsibilities
//! - Build the backend URL from the configured base and the resolved path
//! - Send exactly one request per client request (no retries)
//! - Buffer the full response inside the cancellation scope
//! - Hand back status, reason phrase, headers and body untouched
//!
//! `http://` and `https://` backends share one pooled client; TLS uses the
//! bundled webpki root store.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use hyper::ext::ReasonPhrase;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::BackendConfig;
use crate::http::body::ForwardBody;
use crate::observability::metrics;
use crate::resilience::CancellationScope;
use crate::routing::build_target_url;
use crate::upstream::UpstreamError;

/// A request ready to be sent to the backend.
#[derive(Debug)]
pub struct ForwardRequest {
    pub method: Method,
    /// Path relative to the backend base URL, without a leading slash.
    pub target_path: String,
    pub query: Option<String>,
    /// Already sanitized headers.
    pub headers: HeaderMap,
    pub body: ForwardBody,
}

/// A fully buffered backend response.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    /// Set only when the backend sent a non-canonical reason phrase.
    pub reason: Option<ReasonPhrase>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl BackendResponse {
    /// Reason phrase as the backend sent it.
    pub fn status_text(&self) -> &str {
        self.reason
            .as_ref()
            .and_then(|r| std::str::from_utf8(r.as_bytes()).ok())
            .unwrap_or_else(|| self.status.canonical_reason().unwrap_or(""))
    }
}

impl IntoResponse for BackendResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        if let Some(reason) = self.reason {
            response.extensions_mut().insert(reason);
        }
        response
    }
}

/// Sends requests to the backend service.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    base_url: String,
}

impl Forwarder {
    pub fn new(config: &BackendConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_millis(config.connect_timeout_ms)));
        connector.set_nodelay(true);
        connector.enforce_http(false);

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(connector);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            base_url: config.normalized_base_url().to_string(),
        }
    }

    pub fn target_url(&self, target_path: &str, query: Option<&str>) -> String {
        build_target_url(&self.base_url, target_path, query)
    }

    /// Send `request` once and buffer the response within `scope`.
    pub async fn forward(
        &self,
        request: ForwardRequest,
        scope: CancellationScope,
    ) -> Result<BackendResponse, UpstreamError> {
        let url = self.target_url(&request.target_path, request.query.as_deref());

        let mut builder = Request::builder().method(request.method.clone()).uri(&url);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(request.headers);
        }
        let outbound = builder
            .body(request.body.into_body())
            .map_err(|e| UpstreamError::InvalidRequest(format!("{}: {}", url, e)))?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            deadline_ms = scope.deadline().as_millis() as u64,
            "Forwarding to backend"
        );

        let client = self.client.clone();
        scope
            .run(async move {
                let response = client
                    .request(outbound)
                    .await
                    .map_err(|e| UpstreamError::from_client_error(&e))?;

                let (parts, body) = response.into_parts();
                let body = axum::body::to_bytes(Body::new(body), usize::MAX)
                    .await
                    .map_err(|e| UpstreamError::from_body_error(&e))?;

                Ok(BackendResponse {
                    status: parts.status,
                    reason: parts.extensions.get::<ReasonPhrase>().cloned(),
                    headers: parts.headers,
                    body,
                })
            })
            .await
            .inspect_err(|e| {
                metrics::record_upstream_failure(e.kind());
                tracing::warn!(url = %url, kind = e.kind(), error = %e, "Backend call failed");
            })
    }
}

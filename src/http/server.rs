//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, body limit)
//! - Bind server to listener
//! - Forward `/proxy/{*path}` requests to the backend
//! - Serve the barcode endpoint and liveness probe

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::barcode::read_barcode_handler;
use crate::config::{BarcodeConfig, GatewayConfig, LimitsConfig};
use crate::error::GatewayError;
use crate::http::body::read_forward_body;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::observability::metrics;
use crate::routing::{resolve_target_path, TimeoutPolicy};
use crate::security::sanitize_headers;
use crate::upstream::{BackendResponse, ForwardRequest, Forwarder};

/// Application state injected into handlers.
///
/// Everything here is read-only; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub timeouts: Arc<TimeoutPolicy>,
    pub limits: LimitsConfig,
    pub barcode: BarcodeConfig,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            forwarder: Arc::new(Forwarder::new(&config.backend)),
            timeouts: Arc::new(TimeoutPolicy::from_config(&config.timeouts)),
            limits: config.limits.clone(),
            barcode: config.barcode.clone(),
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route(
                "/proxy/{*path}",
                get(proxy_handler)
                    .post(proxy_handler)
                    .put(proxy_handler)
                    .delete(proxy_handler),
            )
            .route("/read-barcode", post(read_barcode_handler))
            .route("/healthz", get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(DefaultBodyLimit::max(config.limits.max_body_bytes)),
            )
    }

    /// The fully layered router, for driving the gateway without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all proxy handler.
/// Sanitizes the request, forwards it once, and relays the backend reply.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers()).to_string();

    match forward(&state, request).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = response.status.as_u16(),
                status_text = response.status_text(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Proxied request"
            );
            metrics::record_request("proxy", method.as_str(), response.status.as_u16(), start);
            response.into_response()
        }
        Err(err) => {
            let status = err.status_code();
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                error_code = err.error_code(),
                error = %err,
                "Proxy request failed"
            );
            metrics::record_request("proxy", method.as_str(), status.as_u16(), start);
            err.into_response()
        }
    }
}

async fn forward(state: &AppState, request: Request<Body>) -> Result<BackendResponse, GatewayError> {
    let target_path = resolve_target_path(request.uri().path())?;
    let query = request.uri().query().map(str::to_owned);

    let (parts, body) = request.into_parts();
    let headers = sanitize_headers(&parts.headers);
    let body =
        read_forward_body(&parts.method, &parts.headers, body, state.limits.max_body_bytes).await?;

    let scope = state.timeouts.scope_for(&target_path);
    tracing::debug!(
        target_path = %target_path,
        route = state.timeouts.route_name(&target_path),
        body_bytes = body.len(),
        "Resolved proxy target"
    );

    let response = state
        .forwarder
        .forward(
            ForwardRequest {
                method: parts.method,
                target_path,
                query,
                headers,
                body,
            },
            scope,
        )
        .await?;

    Ok(response)
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

/// Liveness probe. Never contacts the backend.
async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

//! `POST /read-barcode` route.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::barcode::codec::decode_upload;
use crate::barcode::translator::{translate, NormalizedBarcodeResult};
use crate::error::GatewayError;
use crate::http::body::ForwardBody;
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{BackendResponse, ForwardRequest};

/// Backend endpoint performing barcode recognition.
pub const BACKEND_BARCODE_PATH: &str = "api/read-barcode";

/// Longest backend error body echoed back in `details`.
const MAX_DETAILS_LEN: usize = 512;

pub async fn read_barcode_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(request.headers()).to_string();

    match read_barcode(&state, request, &request_id).await {
        Ok(result) => {
            tracing::info!(
                request_id = %request_id,
                success = result.success,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Barcode request completed"
            );
            metrics::record_request("barcode", "POST", 200, start);
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, error_code = err.error_code(), error = %err, "Barcode request failed");
            } else {
                tracing::warn!(request_id = %request_id, error_code = err.error_code(), error = %err, "Barcode request rejected");
            }
            metrics::record_request("barcode", "POST", status.as_u16(), start);
            err.into_response()
        }
    }
}

async fn read_barcode(
    state: &AppState,
    request: Request<Body>,
    request_id: &str,
) -> Result<NormalizedBarcodeResult, GatewayError> {
    let upload = decode_upload(
        request,
        state.limits.max_body_bytes,
        &state.barcode.default_format,
    )
    .await?;

    let payload = serde_json::to_string(&upload.to_backend_payload())
        .map_err(|e| GatewayError::Internal(format!("encode barcode payload: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(X_REQUEST_ID, value);
    }

    tracing::debug!(
        request_id = %request_id,
        format = %upload.format,
        image_b64_len = upload.image.len(),
        "Forwarding barcode image"
    );

    let scope = state.timeouts.scope_for(BACKEND_BARCODE_PATH);
    let response = state
        .forwarder
        .forward(
            ForwardRequest {
                method: Method::POST,
                target_path: BACKEND_BARCODE_PATH.to_string(),
                query: None,
                headers,
                body: ForwardBody::TextBody(payload),
            },
            scope,
        )
        .await?;

    interpret_backend_response(response)
}

/// Validate a backend reply and normalize it.
pub fn interpret_backend_response(
    response: BackendResponse,
) -> Result<NormalizedBarcodeResult, GatewayError> {
    if !response.status.is_success() {
        return Err(GatewayError::BackendError {
            status: response.status,
            details: backend_error_details(&response.body),
        });
    }

    let value: Value = serde_json::from_slice(&response.body)
        .map_err(|e| GatewayError::InvalidUpstreamResponse(format!("body is not JSON: {}", e)))?;
    let object = value.as_object().ok_or_else(|| {
        GatewayError::InvalidUpstreamResponse("expected a JSON object".to_string())
    })?;

    Ok(translate(object))
}

/// Prefer the backend's own `detail`/`message`, else the raw body text.
fn backend_error_details(body: &[u8]) -> String {
    let from_json = serde_json::from_slice::<Value>(body).ok().and_then(|v| {
        ["detail", "message", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_owned))
    });
    let text = from_json.unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
    text.chars().take(MAX_DETAILS_LEN).collect()
}

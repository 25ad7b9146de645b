//! Strict body decoding for barcode uploads.
//!
//! Accepted forms:
//! - `multipart/form-data` with a file in field `image` (optional text field `format`)
//! - JSON `{"image": "<base64 or data URI>", "format"?: "..."}`
//!
//! Anything else is an `InvalidRequestFormat` error telling the client a file
//! upload was expected. Uploads over `limits.max_body_bytes` are
//! `PayloadTooLarge`.

use axum::body::{Body, Bytes};
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart};
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::error::GatewayError;
use crate::http::body::{is_length_limit, is_multipart, read_limited};

/// Form field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Form field carrying the optional format hint.
pub const FORMAT_FIELD: &str = "format";

const UPLOAD_GUIDANCE: &str =
    "Expected an image file upload in form field 'image' or a JSON body with a base64 'image'";

/// A validated image ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeUpload {
    /// Standard base64 without any data-URI prefix.
    pub image: String,
    pub format: String,
}

impl BarcodeUpload {
    fn from_bytes(bytes: &[u8], format: Option<String>, default_format: &str) -> Self {
        Self {
            image: STANDARD.encode(bytes),
            format: format.unwrap_or_else(|| default_format.to_string()),
        }
    }

    /// JSON body expected by the backend's `/api/read-barcode`.
    pub fn to_backend_payload(&self) -> serde_json::Value {
        json!({
            "image": self.image,
            "format": self.format,
        })
    }
}

#[derive(Debug, Deserialize)]
struct JsonUpload {
    image: String,
    #[serde(default)]
    format: Option<String>,
}

/// Decode the inbound barcode request.
pub async fn decode_upload(
    request: Request<Body>,
    limit: usize,
    default_format: &str,
) -> Result<BarcodeUpload, GatewayError> {
    if is_multipart(request.headers()) {
        decode_multipart(request, limit, default_format).await
    } else {
        decode_json(request.into_body(), limit, default_format).await
    }
}

fn invalid(reason: impl std::fmt::Display) -> GatewayError {
    tracing::debug!(reason = %reason, "Rejected barcode upload");
    GatewayError::InvalidRequestFormat(UPLOAD_GUIDANCE.to_string())
}

fn multipart_error(limit: usize) -> impl Fn(MultipartError) -> GatewayError {
    move |err| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge(limit)
        } else {
            invalid(err)
        }
    }
}

/// The extractor enforces the router's `DefaultBodyLimit`, which is built
/// from the same `limit`.
async fn decode_multipart(
    request: Request<Body>,
    limit: usize,
    default_format: &str,
) -> Result<BarcodeUpload, GatewayError> {
    let mut multipart = Multipart::from_request(request, &()).await.map_err(invalid)?;
    let on_error = multipart_error(limit);

    let mut image: Option<Bytes> = None;
    let mut format: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(&on_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let bytes = field.bytes().await.map_err(&on_error)?;
                if !bytes.is_empty() {
                    image = Some(bytes);
                }
            }
            Some(FORMAT_FIELD) => {
                let text = field.text().await.map_err(&on_error)?;
                let text = text.trim();
                if !text.is_empty() {
                    format = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| invalid("multipart body has no non-empty 'image' field"))?;
    Ok(BarcodeUpload::from_bytes(&image, format, default_format))
}

async fn decode_json(
    body: Body,
    limit: usize,
    default_format: &str,
) -> Result<BarcodeUpload, GatewayError> {
    let bytes = read_limited(body, limit).await.map_err(|e| {
        if is_length_limit(&e) {
            GatewayError::PayloadTooLarge(limit)
        } else {
            invalid(e)
        }
    })?;
    let upload: JsonUpload = serde_json::from_slice(&bytes).map_err(invalid)?;

    let decoded = decode_image_string(&upload.image)?;
    let format = upload
        .format
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());
    Ok(BarcodeUpload::from_bytes(&decoded, format, default_format))
}

/// Strip a `data:<mime>;base64,` prefix if present.
pub fn strip_data_uri(image: &str) -> &str {
    let trimmed = image.trim();
    if trimmed.starts_with("data:") {
        if let Some(idx) = trimmed.find(";base64,") {
            return &trimmed[idx + ";base64,".len()..];
        }
    }
    trimmed
}

/// Decode a base64 or data-URI image string into raw bytes.
pub fn decode_image_string(image: &str) -> Result<Vec<u8>, GatewayError> {
    let compact: String = strip_data_uri(image)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let decoded = STANDARD.decode(compact.as_bytes()).map_err(invalid)?;
    if decoded.is_empty() {
        return Err(invalid("image decodes to zero bytes"));
    }
    Ok(decoded)
}

//! Backend barcode payload → client-facing result.
//!
//! The gateway is the source of truth for `success`: the backend flag can only
//! veto a result, never confirm one without a barcode.

use serde::Serialize;
use serde_json::{Map, Value};

pub const SUCCESS_MESSAGE: &str = "Verification successful";
pub const NOT_FOUND_MESSAGE: &str = "No barcode found";

/// Barcode result as returned to the kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBarcodeResult {
    pub barcode: Option<String>,
    pub success: bool,
    pub message: String,
    pub first_name: Option<String>,
}

/// Normalize a backend JSON object.
pub fn translate(payload: &Map<String, Value>) -> NormalizedBarcodeResult {
    let barcode = string_field(payload, "barcode");
    let first_name =
        string_field(payload, "firstName").or_else(|| string_field(payload, "first_name"));

    let vetoed = matches!(payload.get("success"), Some(Value::Bool(false)));
    let success = !vetoed && barcode.is_some();

    let message = string_field(payload, "message").unwrap_or_else(|| {
        if success {
            SUCCESS_MESSAGE.to_string()
        } else {
            NOT_FOUND_MESSAGE.to_string()
        }
    });

    NormalizedBarcodeResult {
        barcode,
        success,
        message,
        first_name,
    }
}

/// Non-empty string value of `key`. Numeric barcodes are rendered as text.
fn string_field(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

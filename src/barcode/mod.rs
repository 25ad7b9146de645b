//! Barcode upload subsystem.
//!
//! # Data Flow
//! ```text
//! POST /read-barcode (multipart `image` | JSON `{image, format?}`)
//!     → codec.rs (strict decode, base64 normalization)
//!     → Forwarder: POST <backend>/api/read-barcode {image, format}
//!     → handler.rs (status check, JSON validation)
//!     → translator.rs (field-name normalization, `success` recomputed)
//! ```
//!
//! # Design Decisions
//! - Upstream 5xx is reported as 502, 4xx passes through
//! - A 2xx reply that is not a JSON object is a contract violation (502)

pub mod codec;
pub mod handler;
pub mod translator;

pub use handler::read_barcode_handler;
pub use translator::{translate, NormalizedBarcodeResult};

//! Request hygiene subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound headers
//!     → headers.rs (strip connection-scoped fields, pin content type)
//!     → Forwarder
//! ```
//!
//! Path traversal is guarded in `routing::target`; body size limits are
//! enforced by the body codec.

pub mod headers;

pub use headers::sanitize_headers;

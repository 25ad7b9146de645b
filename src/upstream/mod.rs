//! Backend connectivity subsystem.
//!
//! # Data Flow
//! ```text
//! ForwardRequest (sanitized headers + ForwardBody)
//!     → forwarder.rs (one hyper call inside a CancellationScope)
//!     → Ok: BackendResponse (status, headers, buffered body)
//!     → Err: error.rs (UpstreamError kind → GatewayError)
//! ```
//!
//! # Design Decisions
//! - One shared pooled client; the gateway itself holds no per-request state
//! - Failure kinds are structured, never inferred from message text

pub mod error;
pub mod forwarder;

pub use error::UpstreamError;
pub use forwarder::{BackendResponse, ForwardRequest, Forwarder};

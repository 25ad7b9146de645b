//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → request.rs (request ID generation / lookup)
//!     → body.rs (body strategy: NoBody | TextBody | BinaryBody)
//!     → security::headers (sanitize)
//!     → upstream::Forwarder (one backend call under a deadline)
//!     → relay backend response, or GatewayError JSON
//! ```

pub mod body;
pub mod request;
pub mod server;

pub use body::{BodyStrategy, ForwardBody};
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

//! Kiosk gateway library.
//!
//! Forwards browser requests from the health kiosk to the backend service and
//! maps every failure onto a small, stable error taxonomy.

pub mod barcode;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;

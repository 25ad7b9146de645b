//! Request routing subsystem.
//!
//! # Data Flow
//! ```text
//! /proxy/{*path}
//!     → target.rs (strip prefix, traversal guard, build backend URL)
//!     → policy.rs (deadline for the resolved path)
//! ```
//!
//! # Design Decisions
//! - No routing table: the backend path is the client path
//! - Timeout policy is the only per-route behaviour

pub mod policy;
pub mod target;

pub use policy::{RoutePolicy, TimeoutPolicy, BARCODE_ROUTE_MARKER};
pub use target::{build_target_url, resolve_target_path};

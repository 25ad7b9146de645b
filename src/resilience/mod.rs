//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → routing::policy (pick the route deadline)
//!     → timeouts.rs (cancellation scope around the single outbound call)
//!     → On expiry: UpstreamError::Timeout → 504
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every backend call has a deadline
//! - No automatic retries: one backend invocation per client request,
//!   retrying is the kiosk client's decision

pub mod timeouts;

pub use timeouts::CancellationScope;

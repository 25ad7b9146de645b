//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     CLI flags → Load config → Validate → Init logging/metrics → Bind → Serve
//!
//! Shutdown (signals.rs → HttpServer::run):
//!     SIGTERM/SIGINT → Stop accepting → Drain in-flight requests → Exit
//! ```

pub mod signals;

//! Route timeout policies.
//!
//! # Responsibilities
//! - Map a resolved target path to its deadline
//! - Hand out a cancellation scope bound to that deadline
//!
//! # Design Decisions
//! - Predicates are plain substring matches on the target path
//! - First matching policy wins; no match falls back to the default
//! - Deadlines come from `TimeoutConfig`, never from literals here

use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::resilience::CancellationScope;

/// Path fragment identifying image/barcode processing routes.
pub const BARCODE_ROUTE_MARKER: &str = "read-barcode";

/// A single route policy: paths containing `fragment` get `timeout`.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    pub name: &'static str,
    pub fragment: &'static str,
    pub timeout: Duration,
}

impl RoutePolicy {
    pub fn matches(&self, target_path: &str) -> bool {
        target_path.contains(self.fragment)
    }
}

/// Ordered set of route policies plus the fallback deadline.
#[derive(Debug, Clone)]
pub struct TimeoutPolicy {
    routes: Vec<RoutePolicy>,
    default_timeout: Duration,
}

impl TimeoutPolicy {
    pub fn from_config(config: &TimeoutConfig) -> Self {
        Self {
            routes: vec![RoutePolicy {
                name: "barcode",
                fragment: BARCODE_ROUTE_MARKER,
                timeout: config.barcode_timeout(),
            }],
            default_timeout: config.default_timeout(),
        }
    }

    /// Name of the policy applied to `target_path`, for logs and metrics.
    pub fn route_name(&self, target_path: &str) -> &'static str {
        self.routes
            .iter()
            .find(|route| route.matches(target_path))
            .map_or("default", |route| route.name)
    }

    pub fn deadline_for(&self, target_path: &str) -> Duration {
        self.routes
            .iter()
            .find(|route| route.matches(target_path))
            .map_or(self.default_timeout, |route| route.timeout)
    }

    pub fn scope_for(&self, target_path: &str) -> CancellationScope {
        CancellationScope::new(self.deadline_for(target_path))
    }
}

//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap backend calls with a per-route deadline
//! - Cancel the outbound call cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout
//! - Cancellation is unilateral: the backend may keep working on an
//!   abandoned request

use std::future::Future;
use std::time::{Duration, Instant};

use crate::upstream::UpstreamError;

/// A time-bounded execution context for one outbound call.
#[derive(Debug, Clone, Copy)]
pub struct CancellationScope {
    deadline: Duration,
}

impl CancellationScope {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Run `fut` to completion or until the deadline fires.
    ///
    /// The timer lives inside the returned future, so it is released on every
    /// exit path: success, failure, expiry, or the caller being dropped.
    pub async fn run<F, T>(self, fut: F) -> Result<T, UpstreamError>
    where
        F: Future<Output = Result<T, UpstreamError>>,
    {
        let started = Instant::now();
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    deadline_ms = self.deadline.as_millis() as u64,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Outbound call cancelled by deadline"
                );
                Err(UpstreamError::Timeout(self.deadline))
            }
        }
    }
}

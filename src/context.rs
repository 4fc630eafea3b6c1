//! Per-request execution context carrying the request deadline.
//!
//! A [`RequestContext`] is created once at the transport boundary and passed
//! by reference through the service into repository adapters. Every layer
//! measures against the same absolute deadline, so a request never gets more
//! time than it was granted on arrival.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Default per-request budget applied by the transport layer.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Error returned when a bounded operation outlives its deadline.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

/// Deadline-bearing context for a single inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    deadline: Instant,
}

impl RequestContext {
    /// Creates a context expiring `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    /// Returns the time left before the deadline, saturating at zero.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Returns `true` once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Drives `future` to completion unless the deadline passes first.
    ///
    /// The future is dropped on expiry.
    ///
    /// # Errors
    ///
    /// Returns [`DeadlineExceeded`] when the deadline elapses before the
    /// future resolves.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        tokio::time::timeout_at(self.deadline, future)
            .await
            .map_err(|_| DeadlineExceeded)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }
}

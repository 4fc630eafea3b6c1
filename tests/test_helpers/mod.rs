//! Shared clock and context helpers for integration tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use taskforge::context::RequestContext;

/// Seconds since the epoch for 2026-01-01T00:00:00Z.
const START_SECONDS: i64 = 1_767_225_600;

/// Clock that moves forward one second on every reading.
///
/// Successive inserts therefore get strictly increasing timestamps, which
/// keeps ordering assertions independent of wall-clock resolution.
#[derive(Debug)]
pub struct SteppingClock {
    seconds: AtomicI64,
}

impl SteppingClock {
    /// Creates a clock starting at the beginning of 2026.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seconds: AtomicI64::new(START_SECONDS),
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let seconds = self.seconds.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(seconds, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Returns a context with a generous deadline for ordinary test calls.
#[must_use]
pub fn ctx() -> RequestContext {
    RequestContext::with_timeout(Duration::from_secs(10))
}

//! Shared fixtures for in-memory service tests.

use crate::test_helpers::SteppingClock;
use rstest::fixture;
use std::sync::Arc;
use taskforge::task::{adapters::memory::InMemoryTaskRepository, services::TaskService};

/// Service type used across in-memory tests.
pub type TestService = TaskService<InMemoryTaskRepository<SteppingClock>>;

/// Provides a service over an empty repository with a stepping clock.
#[fixture]
pub fn service() -> TestService {
    TaskService::new(Arc::new(InMemoryTaskRepository::with_clock(Arc::new(
        SteppingClock::new(),
    ))))
}

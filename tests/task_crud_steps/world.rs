//! Shared world state for task CRUD BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::{self, SteppingClock};
use rstest::fixture;
use taskforge::context::RequestContext;
use taskforge::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{TaskService, TaskServiceError},
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskService<InMemoryTaskRepository<SteppingClock>>;

/// Scenario world for task CRUD behaviour tests.
pub struct TaskCrudWorld {
    pub service: TestTaskService,
    pub created: Option<Task>,
    pub current: Option<Task>,
    pub listed: Vec<Task>,
    pub last_error: Option<TaskServiceError>,
}

impl TaskCrudWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: TaskService::new(Arc::new(InMemoryTaskRepository::with_clock(Arc::new(
                SteppingClock::new(),
            )))),
            created: None,
            current: None,
            listed: Vec::new(),
            last_error: None,
        }
    }

    /// Returns the task the scenario is working on.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.current
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Records the outcome of a service call.
    pub fn record(&mut self, result: Result<Task, TaskServiceError>) {
        match result {
            Ok(task) => {
                self.current = Some(task);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }
}

impl Default for TaskCrudWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskCrudWorld {
    TaskCrudWorld::default()
}

/// Returns a fresh request context for one step.
#[must_use]
pub fn ctx() -> RequestContext {
    test_helpers::ctx()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

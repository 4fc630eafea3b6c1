//! Repository port for task persistence and lookup.

use crate::context::{DeadlineExceeded, RequestContext};
use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Fields supplied by the caller when inserting a task.
///
/// Identifier and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional description; `None` is stored as absent, not as empty text.
    pub description: Option<String>,
}

impl NewTask {
    /// Creates an insert request with no description.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Task persistence contract.
///
/// Every method receives the request context and must stop waiting on the
/// store once its deadline has passed.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task and returns it as stored, including the assigned
    /// identifier and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::EmptyTitle`] when the title is empty and
    /// [`TaskRepositoryError::Persistence`] when the insert fails.
    async fn create(&self, ctx: &RequestContext, new_task: &NewTask) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, ctx: &RequestContext, id: TaskId)
    -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task whose title or description contains `filter`,
    /// newest first. An empty filter matches every task.
    async fn list(&self, ctx: &RequestContext, filter: &str) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists all mutable fields of `task` and refreshes `updated_at`.
    ///
    /// Returns the task as stored after the update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no row was affected.
    async fn update(&self, ctx: &RequestContext, task: &Task) -> TaskRepositoryResult<Task>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no row was affected.
    async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A mutation affected no rows because the task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store refused a task with an empty title.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The request deadline passed before the store call completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<DeadlineExceeded> for TaskRepositoryError {
    fn from(_: DeadlineExceeded) -> Self {
        Self::DeadlineExceeded
    }
}

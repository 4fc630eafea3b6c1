//! Service layer enforcing task invariants and classifying failures.

use crate::context::RequestContext;
use crate::task::{
    domain::{Task, TaskDomainError, TaskId},
    ports::{NewTask, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Service-level errors for task operations.
///
/// This is the only taxonomy callers branch on. Persistence failures keep the
/// repository error as their source for logging but render opaquely.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input failed a domain precondition.
    #[error(transparent)]
    InvalidData(#[from] TaskDomainError),
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The request deadline passed before the operation completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// Any other store failure.
    #[error("internal persistence failure")]
    Persistence(#[source] TaskRepositoryError),
}

/// Coarse category of a [`TaskServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// Input failed a domain precondition.
    InvalidData,
    /// The referenced task does not exist.
    NotFound,
    /// The operation ran out of time.
    DeadlineExceeded,
    /// Opaque internal failure.
    Persistence,
}

impl TaskServiceError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::InvalidData(_) => TaskErrorKind::InvalidData,
            Self::NotFound(_) => TaskErrorKind::NotFound,
            Self::DeadlineExceeded => TaskErrorKind::DeadlineExceeded,
            Self::Persistence(_) => TaskErrorKind::Persistence,
        }
    }
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::EmptyTitle => Self::InvalidData(TaskDomainError::EmptyTitle),
            TaskRepositoryError::DeadlineExceeded => Self::DeadlineExceeded,
            TaskRepositoryError::Persistence(_) => Self::Persistence(err),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
///
/// Stateless apart from the shared repository handle; every call round-trips
/// to the store exactly once.
pub struct TaskService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> Clone for TaskService<R>
where
    R: TaskRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> TaskService<R>
where
    R: TaskRepository,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a task with `completed = false`.
    ///
    /// The returned task carries the identifier and timestamps assigned by
    /// the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::InvalidData`] for an empty title without
    /// touching the store, [`TaskServiceError::DeadlineExceeded`] on timeout,
    /// and [`TaskServiceError::Persistence`] for any other store failure.
    pub async fn create_task(
        &self,
        ctx: &RequestContext,
        title: impl Into<String>,
        description: Option<String>,
    ) -> TaskServiceResult<Task> {
        let new_task = NewTask {
            title: title.into(),
            description,
        };
        if let Err(err) = Task::validate_title(&new_task.title) {
            let failure = TaskServiceError::from(err);
            log_failure("create_task", &failure);
            return Err(failure);
        }

        let task = guarded(ctx, "create_task", self.repository.create(ctx, &new_task)).await?;
        info!(task_id = %task.id(), title = %task.title(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the repository reports no
    /// such task.
    pub async fn get_task(&self, ctx: &RequestContext, id: TaskId) -> TaskServiceResult<Task> {
        let found = guarded(ctx, "get_task", self.repository.find_by_id(ctx, id)).await?;
        let Some(task) = found else {
            let failure = TaskServiceError::NotFound(id);
            log_failure("get_task", &failure);
            return Err(failure);
        };
        info!(task_id = %id, "task retrieved");
        Ok(task)
    }

    /// Lists tasks whose title or description contains `filter`, newest
    /// first. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::DeadlineExceeded`] or
    /// [`TaskServiceError::Persistence`] when the lookup fails.
    pub async fn list_tasks(
        &self,
        ctx: &RequestContext,
        filter: &str,
    ) -> TaskServiceResult<Vec<Task>> {
        let tasks = guarded(ctx, "list_tasks", self.repository.list(ctx, filter)).await?;
        info!(filter, count = tasks.len(), "tasks listed");
        Ok(tasks)
    }

    /// Persists a fully merged task snapshot.
    ///
    /// Partial-field merging is the caller's job; every mutable field of
    /// `task` is written. Returns the task as stored, with a refreshed
    /// `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::InvalidData`] for an empty title and
    /// [`TaskServiceError::NotFound`] when the task no longer exists.
    pub async fn update_task(&self, ctx: &RequestContext, task: &Task) -> TaskServiceResult<Task> {
        if let Err(err) = Task::validate_title(task.title()) {
            let failure = TaskServiceError::from(err);
            log_failure("update_task", &failure);
            return Err(failure);
        }

        let updated = guarded(ctx, "update_task", self.repository.update(ctx, task)).await?;
        info!(task_id = %updated.id(), "task updated");
        Ok(updated)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist,
    /// including when it was already deleted.
    pub async fn delete_task(&self, ctx: &RequestContext, id: TaskId) -> TaskServiceResult<()> {
        guarded(ctx, "delete_task", self.repository.delete(ctx, id)).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

/// Runs one repository call under the request deadline and classifies its
/// failure.
async fn guarded<T, F>(
    ctx: &RequestContext,
    operation: &'static str,
    future: F,
) -> TaskServiceResult<T>
where
    F: Future<Output = TaskRepositoryResult<T>>,
{
    let outcome = match ctx.run(future).await {
        Ok(result) => result.map_err(TaskServiceError::from),
        Err(_) => Err(TaskServiceError::DeadlineExceeded),
    };
    if let Err(ref failure) = outcome {
        log_failure(operation, failure);
    }
    outcome
}

fn log_failure(operation: &'static str, failure: &TaskServiceError) {
    match failure {
        TaskServiceError::InvalidData(err) => {
            warn!(operation, error = %err, "rejected invalid task data");
        }
        TaskServiceError::NotFound(id) => warn!(operation, task_id = %id, "task not found"),
        TaskServiceError::DeadlineExceeded => error!(operation, "request deadline exceeded"),
        TaskServiceError::Persistence(source) => {
            error!(operation, error = ?source, "task persistence failed");
        }
    }
}

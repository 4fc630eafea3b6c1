//! In-memory repository for task tests and local runs.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::context::RequestContext;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId},
    ports::{NewTask, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Identifiers come from a counter that never goes backwards, so a deleted
/// task's id is never handed out again. Filtering is case-sensitive.
pub struct InMemoryTaskRepository<C = DefaultClock> {
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    last_id: i64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for InMemoryTaskRepository<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty repository stamping rows with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
        }
    }

    fn read(
        &self,
        ctx: &RequestContext,
    ) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        ensure_live(ctx)?;
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
        ctx: &RequestContext,
    ) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        ensure_live(ctx)?;
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn ensure_live(ctx: &RequestContext) -> TaskRepositoryResult<()> {
    if ctx.is_expired() {
        return Err(TaskRepositoryError::DeadlineExceeded);
    }
    Ok(())
}

fn matches_filter(task: &Task, filter: &str) -> bool {
    task.title().contains(filter) || task.description().is_some_and(|text| text.contains(filter))
}

#[async_trait]
impl<C> TaskRepository for InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn create(&self, ctx: &RequestContext, new_task: &NewTask) -> TaskRepositoryResult<Task> {
        if new_task.title.is_empty() {
            return Err(TaskRepositoryError::EmptyTitle);
        }

        let mut state = self.write(ctx)?;
        state.last_id += 1;
        let now = self.clock.utc();
        let task = Task::from_persisted(PersistedTaskData {
            id: TaskId::new(state.last_id),
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            completed: false,
            created_at: now,
            updated_at: now,
        });
        state.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: TaskId,
    ) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read(ctx)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, ctx: &RequestContext, filter: &str) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read(ctx)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches_filter(task, filter))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| Reverse((task.created_at(), task.id())));
        Ok(tasks)
    }

    async fn update(&self, ctx: &RequestContext, task: &Task) -> TaskRepositoryResult<Task> {
        if task.title().is_empty() {
            return Err(TaskRepositoryError::EmptyTitle);
        }

        let mut state = self.write(ctx)?;
        let stored = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;

        let updated_at = self
            .clock
            .utc()
            .max(stored.updated_at())
            .max(task.updated_at());
        let updated = Task::from_persisted(PersistedTaskData {
            id: task.id(),
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            completed: task.is_completed(),
            created_at: stored.created_at(),
            updated_at,
        });
        state.tasks.insert(updated.id(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write(ctx)?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }
}

//! `SQLite` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    pool::TaskSqlitePool,
    schema::task,
};
use crate::context::RequestContext;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId},
    ports::{NewTask, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::connection::SimpleConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Timestamp;
use diesel::sqlite::SqliteConnection;
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use std::time::Duration;

/// Escape character used for literal substring matching with `LIKE`.
const LIKE_ESCAPE: char = '\\';

/// Budget that must remain for a transaction to commit.
const COMMIT_MARGIN: Duration = Duration::from_millis(5);

/// Largest lock wait `SQLite` accepts.
const MAX_BUSY_TIMEOUT_MS: u64 = 2_147_483_647;

/// `SQLite`-backed task repository.
///
/// Statements run on the blocking thread pool, each call in its own
/// transaction. Lock waits never outlast the request deadline, and work that
/// finishes too late is rolled back.
pub struct SqliteTaskRepository<C = DefaultClock> {
    pool: TaskSqlitePool,
    clock: Arc<C>,
}

impl SqliteTaskRepository {
    /// Creates a new repository from a connection pool, using the system
    /// clock for timestamps.
    #[must_use]
    pub fn new(pool: TaskSqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }
}

impl<C> Clone for SqliteTaskRepository<C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> SqliteTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new repository stamping rows with `clock`.
    #[must_use]
    pub const fn with_clock(pool: TaskSqlitePool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.utc().naive_utc()
    }

    /// Runs `f` on the blocking pool inside a transaction bounded by the
    /// request deadline.
    ///
    /// Lock waits are narrowed to the remaining budget, and the transaction
    /// rolls back unless [`COMMIT_MARGIN`] is still left when `f` returns.
    /// The result therefore always matches what the store kept: a caller
    /// told [`TaskRepositoryError::DeadlineExceeded`] never has its write
    /// land.
    async fn run_blocking<F, T>(&self, ctx: &RequestContext, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        let deadline = *ctx;
        tokio::task::spawn_blocking(move || {
            let mut pooled = checkout(&pool, &deadline)?;
            let connection: &mut SqliteConnection = &mut pooled;
            bound_lock_wait(connection, &deadline)?;
            connection
                .transaction::<_, StatementError, _>(|tx| {
                    let value = f(tx)?;
                    if deadline.remaining() < COMMIT_MARGIN {
                        return Err(StatementError::from(TaskRepositoryError::DeadlineExceeded));
                    }
                    Ok(value)
                })
                .map_err(|err| err.into_repository_error(&deadline))
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl<C> TaskRepository for SqliteTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn create(&self, ctx: &RequestContext, new_task: &NewTask) -> TaskRepositoryResult<Task> {
        if new_task.title.is_empty() {
            return Err(TaskRepositoryError::EmptyTitle);
        }

        let now = self.now();
        let row = NewTaskRow {
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        self.run_blocking(ctx, move |connection| {
            let stored = diesel::insert_into(task::table)
                .values(&row)
                .returning(TaskRow::as_returning())
                .get_result(connection)
                .map_err(map_write_error)?;
            Ok(row_to_task(stored))
        })
        .await
    }

    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: TaskId,
    ) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(ctx, move |connection| {
            let row = task::table
                .find(id.value())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            Ok(row.map(row_to_task))
        })
        .await
    }

    async fn list(&self, ctx: &RequestContext, filter: &str) -> TaskRepositoryResult<Vec<Task>> {
        let pattern = substring_pattern(filter);
        self.run_blocking(ctx, move |connection| {
            let rows = task::table
                .filter(
                    task::title
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE)
                        .or(task::description.like(pattern).escape(LIKE_ESCAPE)),
                )
                .order((task::created_at.desc(), task::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_task).collect())
        })
        .await
    }

    async fn update(&self, ctx: &RequestContext, snapshot: &Task) -> TaskRepositoryResult<Task> {
        if snapshot.title().is_empty() {
            return Err(TaskRepositoryError::EmptyTitle);
        }

        let id = snapshot.id();
        let now = self.now();
        let changes = TaskChangeset {
            title: snapshot.title().to_owned(),
            description: snapshot.description().map(str::to_owned),
            completed: snapshot.is_completed(),
        };

        self.run_blocking(ctx, move |connection| {
            // Compared against the stored row, not the caller's snapshot.
            let advanced = sql::<Timestamp>("MAX(updated_at, ")
                .bind::<Timestamp, _>(now)
                .sql(")");
            let stored = diesel::update(task::table.find(id.value()))
                .set((&changes, task::updated_at.eq(advanced)))
                .returning(TaskRow::as_returning())
                .get_result(connection)
                .optional()
                .map_err(map_write_error)?;
            stored
                .map(row_to_task)
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(ctx, move |connection| {
            let affected = diesel::delete(task::table.find(id.value()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

/// Failure raised inside a deadline-bounded transaction.
enum StatementError {
    Repository(TaskRepositoryError),
    Store(DieselError),
}

impl From<TaskRepositoryError> for StatementError {
    fn from(err: TaskRepositoryError) -> Self {
        Self::Repository(err)
    }
}

impl From<DieselError> for StatementError {
    fn from(err: DieselError) -> Self {
        Self::Store(err)
    }
}

impl StatementError {
    /// Store failures seen after the deadline are lock waits that ran out
    /// with the request budget.
    fn into_repository_error(self, ctx: &RequestContext) -> TaskRepositoryError {
        let err = match self {
            Self::Repository(err) => err,
            Self::Store(err) => TaskRepositoryError::persistence(err),
        };
        match err {
            TaskRepositoryError::Persistence(_) if ctx.is_expired() => {
                TaskRepositoryError::DeadlineExceeded
            }
            other => other,
        }
    }
}

/// Sets the connection's lock wait to the time left, rounded up to whole
/// milliseconds so a lock timeout never fires before the deadline.
fn bound_lock_wait(
    connection: &mut SqliteConnection,
    ctx: &RequestContext,
) -> TaskRepositoryResult<()> {
    let millis = u64::try_from(ctx.remaining().as_micros().div_ceil(1000))
        .unwrap_or(MAX_BUSY_TIMEOUT_MS)
        .min(MAX_BUSY_TIMEOUT_MS);
    connection
        .batch_execute(&format!("PRAGMA busy_timeout = {millis};"))
        .map_err(TaskRepositoryError::persistence)
}

fn checkout(
    pool: &TaskSqlitePool,
    ctx: &RequestContext,
) -> TaskRepositoryResult<PooledConnection<ConnectionManager<SqliteConnection>>> {
    let remaining = ctx.remaining();
    if remaining.is_zero() {
        return Err(TaskRepositoryError::DeadlineExceeded);
    }
    pool.get_timeout(remaining).map_err(|err| {
        if ctx.is_expired() {
            TaskRepositoryError::DeadlineExceeded
        } else {
            TaskRepositoryError::persistence(err)
        }
    })
}

fn map_write_error(err: DieselError) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            TaskRepositoryError::EmptyTitle
        }
        other => TaskRepositoryError::persistence(other),
    }
}

/// Builds a `LIKE` pattern matching `filter` as a literal substring.
fn substring_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for ch in filter.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_task(row: TaskRow) -> Task {
    let TaskRow {
        id,
        title,
        description,
        completed,
        created_at,
        updated_at,
    } = row;

    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id),
        title,
        description,
        completed,
        created_at: created_at.and_utc(),
        updated_at: updated_at.and_utc(),
    })
}

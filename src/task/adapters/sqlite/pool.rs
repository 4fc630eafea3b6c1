//! Connection pool construction and schema bootstrap for the task store.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// `SQLite` connection pool type used by task adapters.
pub type TaskSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// How long a connection waits on a locked database before failing, unless a
/// request narrows it to its remaining budget.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS task (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (title <> ''),
    description TEXT,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_completed ON task(completed);
CREATE INDEX IF NOT EXISTS idx_created_at ON task(created_at);
";

/// Errors raised while opening the task store.
#[derive(Debug, Error)]
pub enum StoreOpenError {
    /// The connection pool could not be built or a connection checked out.
    #[error("failed to open task store: {0}")]
    Pool(#[from] PoolError),
    /// The journal mode or schema could not be set up.
    #[error("failed to prepare task store: {0}")]
    Schema(#[from] diesel::result::Error),
}

#[derive(Debug)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute(&format!(
                "PRAGMA busy_timeout = {};",
                self.busy_timeout.as_millis()
            ))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens (creating if necessary) the task database at `database_path`.
///
/// Switches the file to write-ahead logging, which persists in the database
/// itself, and creates the schema. The returned pool is the process-wide
/// store handle; share it by cloning.
///
/// # Errors
///
/// Returns [`StoreOpenError`] when the pool cannot be built or the schema
/// cannot be created.
pub fn connect(database_path: &str, pool_size: u32) -> Result<TaskSqlitePool, StoreOpenError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_path);
    let pool = Pool::builder()
        .max_size(pool_size.max(1))
        .connection_customizer(Box::new(ConnectionPragmas {
            busy_timeout: BUSY_TIMEOUT,
        }))
        .build(manager)?;

    let mut connection = pool.get()?;
    connection.batch_execute("PRAGMA journal_mode = WAL;")?;
    ensure_schema(&mut connection)?;
    info!(database_path, pool_size, "task store ready");
    Ok(pool)
}

/// Creates the `task` table and its indexes when they do not exist yet.
///
/// # Errors
///
/// Returns the underlying Diesel error when a statement fails.
pub fn ensure_schema(connection: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    connection.batch_execute(CREATE_SCHEMA)
}

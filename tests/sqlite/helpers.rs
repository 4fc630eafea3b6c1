//! Shared fixtures for `SQLite` integration tests.

use crate::test_helpers::SteppingClock;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use taskforge::task::adapters::sqlite::{self, SqliteTaskRepository, TaskSqlitePool};
use tempfile::TempDir;

/// Repository type used across `SQLite` tests.
pub type TestRepository = SqliteTaskRepository<SteppingClock>;

/// A task database living in a temporary directory.
///
/// The directory is removed when the store is dropped.
pub struct TempStore {
    /// Directory holding the database file.
    pub dir: TempDir,
    /// Pool opened over the database file.
    pub pool: TaskSqlitePool,
}

impl TempStore {
    /// Returns the path of the database file.
    #[must_use]
    pub fn path(&self) -> String {
        self.dir.path().join("task.db").to_string_lossy().into_owned()
    }

    /// Builds a repository over this store with a stepping clock.
    #[must_use]
    pub fn repository(&self) -> TestRepository {
        SqliteTaskRepository::with_clock(self.pool.clone(), Arc::new(SteppingClock::new()))
    }

    /// Builds a repository over this store reading time from `clock`.
    #[must_use]
    pub fn repository_with_clock(&self, clock: Arc<ManualClock>) -> SqliteTaskRepository<ManualClock> {
        SqliteTaskRepository::with_clock(self.pool.clone(), clock)
    }
}

/// Clock that holds still until told to move, in either direction.
#[derive(Debug)]
pub struct ManualClock {
    seconds: AtomicI64,
}

impl ManualClock {
    /// Creates a clock fixed at the beginning of 2026.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seconds: AtomicI64::new(1_767_225_600),
        }
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Moves the clock back by `seconds`.
    pub fn rewind(&self, seconds: i64) {
        self.seconds.fetch_sub(seconds, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.seconds.load(Ordering::SeqCst), 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Opens a fresh task database in a new temporary directory.
///
/// # Errors
///
/// Returns an error when the directory or the store cannot be created.
pub fn open_temp_store() -> Result<TempStore, eyre::Report> {
    open_temp_store_with(4)
}

/// Opens a fresh task database whose pool holds at most `pool_size`
/// connections.
///
/// # Errors
///
/// Returns an error when the directory or the store cannot be created.
pub fn open_temp_store_with(pool_size: u32) -> Result<TempStore, eyre::Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("task.db");
    let pool = sqlite::connect(&path.to_string_lossy(), pool_size)?;
    Ok(TempStore { dir, pool })
}

/// Provides a fresh temporary store for each test.
#[fixture]
pub fn store() -> TempStore {
    open_temp_store().expect("temporary task store should open")
}

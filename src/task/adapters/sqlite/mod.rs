//! `SQLite` adapters for task persistence.

mod models;
mod pool;
mod repository;
mod schema;

pub use pool::{StoreOpenError, TaskSqlitePool, connect, ensure_schema};
pub use repository::SqliteTaskRepository;

//! Diesel row models for task persistence.

use super::schema::task;
use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Store-assigned identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp, UTC.
    pub created_at: NaiveDateTime,
    /// Last update timestamp, UTC.
    pub updated_at: NaiveDateTime,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task)]
pub struct NewTaskRow {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp, UTC.
    pub created_at: NaiveDateTime,
    /// Last update timestamp, UTC.
    pub updated_at: NaiveDateTime,
}

/// Changeset written by task updates.
///
/// `updated_at` is set separately against the stored value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = task)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// New title.
    pub title: String,
    /// New description; `None` clears the column.
    pub description: Option<String>,
    /// New completion flag.
    pub completed: bool,
}

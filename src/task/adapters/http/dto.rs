//! Wire representations exchanged with transport clients.

use crate::task::domain::{Task, TaskDomainError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Task as rendered on the wire.
///
/// Timestamps are RFC 3339 in UTC. An absent description renders as an
/// empty string, so absent and empty are indistinguishable to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Store-assigned identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Description, or `""` when absent.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().value(),
            title: task.title().to_owned(),
            description: task.description().unwrap_or_default().to_owned(),
            completed: task.is_completed(),
            created_at: render_timestamp(task.created_at()),
            updated_at: render_timestamp(task.updated_at()),
        }
    }
}

fn render_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Response body for task listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// Matching tasks, newest first.
    pub tasks: Vec<TaskResponse>,
}

/// Request body for task creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters for task listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTasksQuery {
    /// Substring matched against title and description.
    #[serde(default)]
    pub filter: String,
}

/// Request body for partial task updates.
///
/// Only fields present in the request overwrite the stored task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChanges {
    /// Replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement completion flag.
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TaskChanges {
    /// Merges the present fields into `task`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when an empty title is
    /// supplied; `task` is left untouched in that case.
    pub fn apply_to(self, task: &mut Task) -> Result<(), TaskDomainError> {
        if let Some(title) = self.title {
            task.rename(title)?;
        }
        if let Some(description) = self.description {
            task.set_description(Some(description));
        }
        if let Some(completed) = self.completed {
            task.set_completed(completed);
        }
        Ok(())
    }
}

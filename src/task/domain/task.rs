//! Task entity and its persisted representation.

use super::{TaskDomainError, TaskId};
use chrono::{DateTime, Utc};

/// A persisted task.
///
/// Tasks are only ever materialized from the store: the repository assigns
/// `id`, `created_at`, and `updated_at`. Callers mutate a snapshot in memory
/// and hand it back to the service, which persists every mutable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted completion flag.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            completed: data.completed,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Checks that `title` satisfies the non-empty title invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when `title` is empty.
    pub const fn validate_title(title: &str) -> Result<(), TaskDomainError> {
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(())
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, or `None` when it was never supplied.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] and leaves the task unchanged
    /// when `title` is empty.
    pub fn rename(&mut self, title: impl Into<String>) -> Result<(), TaskDomainError> {
        let new_title = title.into();
        Self::validate_title(&new_title)?;
        self.title = new_title;
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Sets the completion flag. Any value may follow any other.
    pub const fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

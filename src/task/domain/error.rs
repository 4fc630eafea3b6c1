//! Error types for task domain validation.

use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty.
    #[error("task title must not be empty")]
    EmptyTitle,
}

//! Port contracts for task management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{NewTask, TaskRepository, TaskRepositoryError, TaskRepositoryResult};

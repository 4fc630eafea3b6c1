//! Domain model for task management.
//!
//! The task domain holds the entity, its identifier, and the title invariant
//! while keeping all infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod task;

pub use error::TaskDomainError;
pub use ids::TaskId;
pub use task::{PersistedTaskData, Task};

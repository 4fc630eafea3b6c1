//! HTTP/JSON transport for task operations.
//!
//! Each inbound request gets its own [`RequestContext`](crate::context::RequestContext)
//! deadline. Partial updates are merged here, so the service only ever sees
//! complete task snapshots. Service failures map onto status codes as
//! follows:
//!
//! | Failure            | Status |
//! |--------------------|--------|
//! | invalid data       | 400    |
//! | not found          | 404    |
//! | deadline exceeded  | 504    |
//! | persistence        | 500    |

mod dto;
mod error;
mod handlers;

pub use dto::{CreateTaskRequest, ListTasksQuery, TaskChanges, TaskListResponse, TaskResponse};
pub use error::{ApiError, ErrorBody};
pub use handlers::{AppState, router};

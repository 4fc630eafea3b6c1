//! Request handlers and router for the task HTTP interface.

use super::dto::{CreateTaskRequest, ListTasksQuery, TaskChanges, TaskListResponse, TaskResponse};
use super::error::ApiError;
use crate::context::RequestContext;
use crate::task::{domain::TaskId, ports::TaskRepository, services::TaskService};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handler state.
pub struct AppState<R>
where
    R: TaskRepository,
{
    service: TaskService<R>,
    request_timeout: Duration,
}

impl<R> Clone for AppState<R>
where
    R: TaskRepository,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

impl<R> AppState<R>
where
    R: TaskRepository,
{
    /// Creates handler state around `service`, bounding each request by
    /// `request_timeout`.
    #[must_use]
    pub const fn new(service: TaskService<R>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    /// Starts the deadline for one inbound request.
    fn begin(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }
}

/// Builds the task router.
pub fn router<R>(state: AppState<R>) -> Router
where
    R: TaskRepository + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks::<R>).post(create_task::<R>))
        .route(
            "/tasks/{id}",
            get(get_task::<R>)
                .patch(update_task::<R>)
                .delete(delete_task::<R>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_task<R>(
    State(state): State<AppState<R>>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError>
where
    R: TaskRepository + 'static,
{
    info!(title = %request.title, "create task request");
    let ctx = state.begin();
    let task = state
        .service
        .create_task(&ctx, request.title, request.description)
        .await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

async fn get_task<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError>
where
    R: TaskRepository + 'static,
{
    info!(task_id = id, "get task request");
    let ctx = state.begin();
    let task = state.service.get_task(&ctx, TaskId::new(id)).await?;
    Ok(Json(TaskResponse::from(&task)))
}

async fn list_tasks<R>(
    State(state): State<AppState<R>>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<TaskListResponse>, ApiError>
where
    R: TaskRepository + 'static,
{
    info!(filter = %query.filter, "list tasks request");
    let ctx = state.begin();
    let tasks = state.service.list_tasks(&ctx, &query.filter).await?;
    Ok(Json(TaskListResponse {
        tasks: tasks.iter().map(TaskResponse::from).collect(),
    }))
}

/// Applies a partial update: fetch, merge present fields, persist.
///
/// Both service calls share the request's single deadline.
async fn update_task<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
    Json(changes): Json<TaskChanges>,
) -> Result<Json<TaskResponse>, ApiError>
where
    R: TaskRepository + 'static,
{
    info!(task_id = id, "update task request");
    let ctx = state.begin();
    let mut task = state.service.get_task(&ctx, TaskId::new(id)).await?;
    changes.apply_to(&mut task)?;
    let updated = state.service.update_task(&ctx, &task).await?;
    Ok(Json(TaskResponse::from(&updated)))
}

async fn delete_task<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    R: TaskRepository + 'static,
{
    info!(task_id = id, "delete task request");
    let ctx = state.begin();
    state.service.delete_task(&ctx, TaskId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Mapping of service failures onto HTTP responses.

use crate::task::{
    domain::TaskDomainError,
    services::{TaskErrorKind, TaskServiceError},
};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// JSON error payload returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message. Never carries store detail.
    pub message: String,
}

/// Transport-level wrapper around [`TaskServiceError`].
#[derive(Debug)]
pub struct ApiError(TaskServiceError);

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.0.kind() {
            TaskErrorKind::InvalidData => StatusCode::BAD_REQUEST,
            TaskErrorKind::NotFound => StatusCode::NOT_FOUND,
            TaskErrorKind::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            TaskErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self.0.kind() {
            TaskErrorKind::InvalidData => "invalid_argument",
            TaskErrorKind::NotFound => "not_found",
            TaskErrorKind::DeadlineExceeded => "deadline_exceeded",
            TaskErrorKind::Persistence => "internal",
        }
    }

    fn message(&self) -> String {
        match self.0.kind() {
            TaskErrorKind::DeadlineExceeded => "request timeout".to_owned(),
            TaskErrorKind::Persistence => "internal error".to_owned(),
            TaskErrorKind::InvalidData | TaskErrorKind::NotFound => self.0.to_string(),
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        Self(err)
    }
}

impl From<TaskDomainError> for ApiError {
    fn from(err: TaskDomainError) -> Self {
        Self(TaskServiceError::InvalidData(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code().to_owned(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{ScheduleError, SessionError};

/// JSON error body returned by every endpoint.
#[derive(Debug)]
pub struct ApiErrorType {
    pub status: StatusCode,
    pub error: String,
    pub context: Option<String>,
}

impl<T: Into<String>> From<(StatusCode, T, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, T, Option<String>)) -> Self {
        Self {
            status,
            error: error.into(),
            context,
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.error,
                "context": self.context,
            })),
        )
            .into_response()
    }
}

impl From<SessionError> for ApiErrorType {
    fn from(error: SessionError) -> Self {
        let (status, message) = match &error {
            SessionError::UnknownRecord { .. } => {
                (StatusCode::NOT_FOUND, "No such course in the current results")
            }
            SessionError::Schedule(ScheduleError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "Course is not on the schedule")
            }
            SessionError::Schedule(ScheduleError::DuplicateId { .. }) => {
                (StatusCode::CONFLICT, "Course is already on the schedule")
            }
            SessionError::Schedule(_) | SessionError::MissingField { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Course time cannot be placed on the schedule",
            ),
            SessionError::Shape(_) => (
                StatusCode::BAD_GATEWAY,
                "Timetable returned rows in an unexpected layout",
            ),
            SessionError::Fetch(e) if e.is_retryable() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Timetable is temporarily unavailable, try again",
            ),
            SessionError::Fetch(_) => (StatusCode::BAD_GATEWAY, "Failed to fetch timetable"),
        };

        ApiErrorType::from((status, message, Some(error.to_string())))
    }
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// GET /schedule
/// Returns every placed event with its conflict flag
pub async fn get_schedule(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /schedule");

    let session = s.session.lock().await;
    (StatusCode::OK, Json(session.events())).into_response()
}

/// POST /schedule/:id
/// Toggles a course: places it if absent, removes it if already placed
pub async fn post_toggle(Path(id): Path<u64>, State(s): State<Arc<AppState>>) -> Response {
    info!("POST /schedule/{}", id);

    let mut session = s.session.lock().await;
    match session.toggle(id) {
        Ok(selection) => (StatusCode::OK, Json(selection)).into_response(),
        Err(e) => {
            warn!("Failed to toggle course {}: {}", id, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// DELETE /schedule/:id
/// Removes a placed course
pub async fn delete_event(Path(id): Path<u64>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /schedule/{}", id);

    let mut session = s.session.lock().await;
    match session.deselect(id) {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

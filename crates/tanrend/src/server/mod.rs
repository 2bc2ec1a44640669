use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{schedule, search, status};
use crate::types::AppState;

mod endpoints;
mod types;

pub use types::ApiErrorType;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let schedule_router = Router::new()
        .route("/schedule", get(schedule::get_schedule))
        .route(
            "/schedule/:id",
            post(schedule::post_toggle).delete(schedule::delete_event),
        );

    Router::new()
        .route("/health", get(status::get_health))
        .route("/fields", get(status::get_fields))
        .route("/search", post(search::post_search))
        .route("/records", get(search::get_records))
        .merge(schedule_router)
        .with_state(app_state)
}

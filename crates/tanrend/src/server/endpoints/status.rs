use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::record::FieldKey;

/// GET /health
pub async fn get_health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// GET /fields
/// Lists every column key with its label, in table order
pub async fn get_fields() -> Response {
    let fields: Vec<_> = FieldKey::ALL
        .iter()
        .map(|key| json!({ "key": key, "label": key.label() }))
        .collect();
    (StatusCode::OK, Json(fields)).into_response()
}

//! Search endpoints: fetch, map and filter a timetable listing.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::SessionError;
use crate::fetch::SearchMode;
use crate::filter::FilterSpec;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Body of `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub mode: SearchMode,
    /// Falls back to the configured default filter
    #[serde(default)]
    pub filter: Option<FilterSpec>,
}

/// POST /search
///
/// Fetches the timetable for `term`, replaces the session's results and
/// clears its schedule.
pub async fn post_search(
    State(s): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Response {
    info!(
        "POST /search - term={:?} mode={}",
        request.term,
        request.mode.form_value()
    );

    // Fetch without holding the session so other requests are not blocked
    let table = match s.client.search(&request.term, request.mode).await {
        Ok(table) => table,
        Err(e) => {
            error!("Search failed: {}", e);
            return ApiErrorType::from(SessionError::from(e)).into_response();
        }
    };

    let spec = request.filter.as_ref().unwrap_or(&s.default_filter);
    let mut session = s.session.lock().await;
    match session.load(&table.rows, spec) {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "summary": result.summary(),
                "rejectedCount": result.rejected_count,
                "fetchedAt": table.fetched_at,
                "fromCache": table.from_cache,
                "records": result.accepted,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to load search results: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /records
///
/// Returns the records of the last successful search.
pub async fn get_records(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /records");

    let session = s.session.lock().await;
    let result = session.result();
    (
        StatusCode::OK,
        Json(json!({
            "summary": result.summary(),
            "rejectedCount": result.rejected_count,
            "records": result.accepted,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::fetch::cache::SearchKey;
    use crate::record::FieldKey;

    fn cached_state() -> Arc<AppState> {
        let state = AppState::from_config(&AppConfig::default()).unwrap();
        let header: Vec<String> = FieldKey::ALL.iter().map(|k| k.label().to_string()).collect();
        let row = |name: &str, teacher: &str| -> Vec<String> {
            [
                "", name, "c", "Kedd 10:00-11:30", "R1", "", "", "előadás", "1", "", "2", "0",
                teacher,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect()
        };
        state.client.cache().insert(
            SearchKey::new("2022-2023-2", SearchMode::CourseName, "alg"),
            vec![header, row("Algebra", "Kovács"), row("Algebra gyak.", "")],
            "2024-01-01T00:00:00+00:00".to_string(),
        );
        Arc::new(state)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_search_applies_request_filter() {
        let state = cached_state();
        let request: SearchRequest = serde_json::from_value(json!({
            "term": "alg",
            "filter": {"excludeEmpty": ["teacher"], "excludeColumns": ["unused"]}
        }))
        .unwrap();

        let response = post_search(State(state.clone()), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["summary"], "1 result");
        assert_eq!(body["rejectedCount"], 1);
        assert_eq!(body["fromCache"], true);
        assert_eq!(body["records"][0]["type"], "EA");
        assert!(body["records"][0].get("unused").is_none());

        let response = get_records(State(state)).await;
        let body = body_json(response).await;
        assert_eq!(body["records"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_search_uses_default_filter() {
        let state = cached_state();
        let request: SearchRequest = serde_json::from_value(json!({"term": "ALG"})).unwrap();

        let response = post_search(State(state), Json(request)).await;
        let body = body_json(response).await;
        assert_eq!(body["summary"], "2 results");
        // The default filter hides the weeks column
        assert!(body["records"][0].get("weeks").is_none());
    }
}

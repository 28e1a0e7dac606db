use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "ok": false, "error": "Not found" })),
    )
        .into_response()
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
}

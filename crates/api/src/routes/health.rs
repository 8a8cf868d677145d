//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

/// Liveness check. Returns 200 as long as the process is serving.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "success": true, "status": "ok" }))
}

/// Readiness check. Pings the database before answering 200.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "success": true, "status": "ready" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "status": "unavailable" })),
            )
        }
    }
}

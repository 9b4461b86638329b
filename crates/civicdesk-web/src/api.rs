//! JSON API route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/complaints
// ---------------------------------------------------------------------------

/// All complaints in creation order.
pub async fn complaints(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list_complaints().await {
        Ok(complaints) => Json(complaints).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to list complaints");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "storage unavailable" })),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Response payload for the `/api/health` endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub version: &'static str,
}

pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };
    (
        code,
        Json(HealthResponse {
            status,
            backend: state.store.backend_name(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

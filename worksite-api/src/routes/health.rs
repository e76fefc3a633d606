//! Liveness and health check endpoints
//!
//! `GET /` answers with static text so load balancers can tell the process
//! is up; `GET /health` additionally round-trips the database.

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use worksite_shared::db::pool;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status: "ok" or "error"
    pub status: &'static str,

    /// Database status: "connected" or "not connected"
    pub db: &'static str,
}

/// Root handler
///
/// ```text
/// GET /
/// ```
pub async fn root() -> &'static str {
    "Worksite API is running."
}

/// Health check handler
///
/// ```text
/// GET /health
/// ```
///
/// Response on success:
/// ```json
/// { "status": "ok", "db": "connected" }
/// ```
///
/// A failed database round-trip answers 500 with
/// `{ "status": "error", "db": "not connected" }`.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match pool::health_check(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                db: "connected",
            }),
        ),
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error",
                    db: "not connected",
                }),
            )
        }
    }
}

//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Active (non-deleted) records in the store
    pub problem_count: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let problem_count = state.store.read().await.active_count();

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "iprep-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: iprep_common::time::seconds_since(state.startup_time),
        problem_count,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

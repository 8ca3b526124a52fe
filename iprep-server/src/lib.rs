//! iprep-server library - HTTP front end for the interview-prep tracker
//!
//! Exposes the problem store, CSV ingestion pipeline, analytics, and export
//! over JSON. All state lives in memory for the life of the process.

use axum::Router;
use chrono::{DateTime, Utc};
use iprep_common::api::EditKeyGate;
use iprep_common::ingest::NormalizeRules;
use iprep_common::ProblemStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod seed;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Problem store; write lock for mutations, read lock for queries
    pub store: Arc<RwLock<ProblemStore>>,
    /// Normalization applied at every ingestion boundary
    pub rules: Arc<NormalizeRules>,
    /// Edit-key check for the UI
    pub edit_key: Arc<EditKeyGate>,
    /// Server startup time (for uptime calculation)
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: ProblemStore, rules: NormalizeRules, edit_key: impl Into<String>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            rules: Arc::new(rules),
            edit_key: Arc::new(EditKeyGate::new(edit_key)),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route(
            "/api/problems",
            get(api::list_problems).post(api::create_problem),
        )
        .route(
            "/api/problems/:id",
            get(api::get_problem)
                .patch(api::update_problem)
                .delete(api::delete_problem),
        )
        .route("/api/csv/parse", post(api::parse_csv_text))
        .route("/api/csv/validate", post(api::validate_csv_rows))
        .route("/api/csv/report", post(api::validation_report))
        .route("/api/csv/import", post(api::import_rows))
        .route("/api/auth/edit-key", post(api::check_edit_key))
        .route("/api/analytics/stats", get(api::get_stats))
        .route("/api/analytics/difficulty", get(api::get_difficulty_distribution))
        .route("/api/analytics/tags", get(api::get_tag_distribution))
        .route("/api/export", get(api::export_problems))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Analytics views over active records

use axum::{extract::State, Json};
use iprep_common::analytics::{DifficultyCount, ProblemStats, TagCount};

use crate::AppState;

/// GET /api/analytics/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<ProblemStats> {
    Json(state.store.read().await.summary_stats())
}

/// GET /api/analytics/difficulty
pub async fn get_difficulty_distribution(
    State(state): State<AppState>,
) -> Json<Vec<DifficultyCount>> {
    Json(state.store.read().await.difficulty_distribution())
}

/// GET /api/analytics/tags
///
/// Ten most frequent tags, descending
pub async fn get_tag_distribution(State(state): State<AppState>) -> Json<Vec<TagCount>> {
    Json(state.store.read().await.tag_distribution())
}

//! Problem CRUD and listing

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use iprep_common::query::{ProblemFilters, ProblemQuery, QueryPage};
use iprep_common::{NewProblem, ProblemPatch, ProblemRecord};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Confirmation body for deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Problem {} not found", id))
}

/// GET /api/problems?search=&difficulty=&status=&sortBy=&sortOrder=&page=&limit=
pub async fn list_problems(
    State(state): State<AppState>,
    query: Result<Query<ProblemQuery>, QueryRejection>,
) -> ApiResult<Json<QueryPage>> {
    let Query(query) = query?;
    let filters = ProblemFilters::try_from(query)?;
    let store = state.store.read().await;
    Ok(Json(store.query(&filters)))
}

/// GET /api/problems/:id
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProblemRecord>> {
    let store = state.store.read().await;
    store
        .get_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// POST /api/problems
pub async fn create_problem(
    State(state): State<AppState>,
    payload: Result<Json<NewProblem>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProblemRecord>)> {
    let Json(input) = payload?;
    let record = state.store.write().await.create(input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /api/problems/:id
pub async fn update_problem(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProblemPatch>, JsonRejection>,
) -> ApiResult<Json<ProblemRecord>> {
    let Json(patch) = payload?;
    patch.validate()?;
    let record = state
        .store
        .write()
        .await
        .update(&id, patch)
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(record))
}

/// DELETE /api/problems/:id (soft delete)
pub async fn delete_problem(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.store.write().await.delete(&id) {
        return Err(not_found(&id));
    }
    Ok(Json(MessageResponse {
        message: format!("Problem {} deleted", id),
    }))
}

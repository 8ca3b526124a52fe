//! Edit-key check endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use iprep_common::api::{EditKeyRequest, EditKeyResponse};

use crate::error::ApiResult;
use crate::AppState;

/// POST /api/auth/edit-key
pub async fn check_edit_key(
    State(state): State<AppState>,
    payload: Result<Json<EditKeyRequest>, JsonRejection>,
) -> ApiResult<Json<EditKeyResponse>> {
    let Json(request) = payload?;
    let valid = state.edit_key.check(&request.key)?;
    if !valid {
        tracing::debug!("Edit key rejected");
    }
    Ok(Json(EditKeyResponse { valid }))
}

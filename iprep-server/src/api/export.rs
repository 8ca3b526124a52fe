//! CSV export endpoint

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use iprep_common::export::{export_csv, EXPORT_FILENAME};
use tracing::info;

use crate::AppState;

/// GET /api/export
///
/// All active records in store order as a CSV attachment
pub async fn export_problems(State(state): State<AppState>) -> Response {
    let (csv, count) = {
        let store = state.store.read().await;
        (export_csv(store.active()), store.active_count())
    };
    info!(count, "Exported problems");

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        csv,
    )
        .into_response()
}

//! CSV ingestion endpoints
//!
//! Ingestion is split the way the upload UI drives it: parse raw text,
//! validate the rows (showing the report), then import the validated rows.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use iprep_common::ingest::{
    parse_csv, validate_table, CsvTable, NormalizeRules, RawRow, ValidationOutcome,
};
use iprep_common::ImportResult;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::ApiResult;
use crate::AppState;

pub const REPORT_FILENAME: &str = "validation_report.txt";

/// Raw rows to validate, with the header list they were split under
///
/// When `headers` is omitted the field names seen across the rows stand in
/// for it.
#[derive(Debug, Deserialize)]
pub struct RowsRequest {
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    pub rows: Vec<RawRow>,
}

impl RowsRequest {
    fn validate(&self, rules: &NormalizeRules) -> ApiResult<ValidationOutcome> {
        let headers = match &self.headers {
            Some(headers) => headers.clone(),
            None => field_names(&self.rows),
        };
        Ok(validate_table(&headers, &self.rows, rules)?)
    }
}

/// Rows to import
///
/// Records stay untyped until the store decodes them one at a time, so a
/// single malformed record is skipped rather than failing the request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub validated_rows: Vec<Value>,
}

/// POST /api/csv/parse
///
/// Body is raw CSV text. Missing required columns or unparseable text is a 400.
pub async fn parse_csv_text(body: String) -> ApiResult<Json<CsvTable>> {
    let table = parse_csv(&body)?;
    info!(rows = table.rows.len(), "Parsed CSV upload");
    Ok(Json(table))
}

/// POST /api/csv/validate
pub async fn validate_csv_rows(
    State(state): State<AppState>,
    payload: Result<Json<RowsRequest>, JsonRejection>,
) -> ApiResult<Json<ValidationOutcome>> {
    let Json(request) = payload?;
    Ok(Json(request.validate(&state.rules)?))
}

/// POST /api/csv/report
///
/// Same input as validate; returns the report as a downloadable text file.
pub async fn validation_report(
    State(state): State<AppState>,
    payload: Result<Json<RowsRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let outcome = request.validate(&state.rules)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILENAME),
            ),
        ],
        outcome.report.render_text(),
    )
        .into_response())
}

/// POST /api/csv/import
pub async fn import_rows(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<Json<ImportResult>> {
    let Json(request) = payload?;
    let result = state.store.write().await.upsert_values(request.validated_rows);
    Ok(Json(result))
}

/// Distinct field names across `rows`, first spelling wins
fn field_names(rows: &[RawRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in rows.iter().flat_map(|row| row.names()) {
        if !names.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }
    names
}

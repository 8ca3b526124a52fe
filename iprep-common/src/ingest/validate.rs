//! Row validator
//!
//! Classifies each raw row as ok, warning, or error and records structured
//! `{row, field, message}` diagnostics. Rows with any error are excluded
//! from the importable set; rows with only warnings are normalized and kept.

use serde::{Deserialize, Serialize};

use super::normalize::{normalize_row, NormalizeRules};
use super::row::{RawRow, FIELD_DIFFICULTY, FIELD_ID, FIELD_LINK, FIELD_TITLE};
use crate::model::{is_absolute_url, CandidateRecord, Difficulty};

/// A single validation finding, addressed by 1-based row and field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl Diagnostic {
    fn new(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Per-row classification; worst severity wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowClass {
    Ok,
    Warning,
    Error,
}

/// Batch-level validation result
///
/// The three row counters are mutually exclusive and sum to the number of
/// rows processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub rows_ok: usize,
    pub rows_with_warnings: usize,
    pub rows_with_errors: usize,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn rows_processed(&self) -> usize {
        self.rows_ok + self.rows_with_warnings + self.rows_with_errors
    }

    fn count(&mut self, class: RowClass) {
        match class {
            RowClass::Ok => self.rows_ok += 1,
            RowClass::Warning => self.rows_with_warnings += 1,
            RowClass::Error => self.rows_with_errors += 1,
        }
    }

    /// Plain-text rendering for a downloadable report
    pub fn render_text(&self) -> String {
        let render = |items: &[Diagnostic]| {
            items
                .iter()
                .map(|d| format!("Row {}, Field {}: {}", d.row, d.field, d.message))
                .collect::<Vec<_>>()
                .join("\n")
        };
        format!(
            "Validation Report\n\nErrors:\n{}\n\nWarnings:\n{}",
            render(&self.errors),
            render(&self.warnings)
        )
    }
}

/// Report plus the normalized rows that may be imported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub report: ValidationReport,
    pub validated_rows: Vec<CandidateRecord>,
}

/// Validate one row, appending its diagnostics to `report`
///
/// Does not touch the row counters; [`validate_rows`] owns those.
pub fn validate_row(row: &RawRow, row_number: usize, report: &mut ValidationReport) -> RowClass {
    let mut class = RowClass::Ok;

    if is_blank(row.get(FIELD_ID)) {
        class = class.max(push_error(report, row_number, FIELD_ID, "ID is required"));
    }

    if is_blank(row.get(FIELD_TITLE)) {
        class = class.max(push_error(report, row_number, FIELD_TITLE, "Title is required"));
    }

    match row.get(FIELD_DIFFICULTY) {
        raw if is_blank(raw) => {
            let message = "Difficulty is required";
            class = class.max(push_error(report, row_number, FIELD_DIFFICULTY, message));
        }
        Some(raw) if Difficulty::normalize(raw) == Difficulty::Unknown => {
            report.warnings.push(Diagnostic::new(
                row_number,
                FIELD_DIFFICULTY,
                format!("Unrecognized difficulty \"{}\", set to Unknown", raw),
            ));
            class = class.max(RowClass::Warning);
        }
        _ => {}
    }

    match row.get(FIELD_LINK) {
        raw if is_blank(raw) => {
            class = class.max(push_error(report, row_number, FIELD_LINK, "Link is required"));
        }
        Some(raw) if !is_absolute_url(raw) => {
            class = class.max(push_error(report, row_number, FIELD_LINK, "Invalid URL format"));
        }
        _ => {}
    }

    class
}

/// Validate a batch, normalizing every row that carries no error
pub fn validate_rows(rows: &[RawRow], rules: &NormalizeRules) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        let class = validate_row(row, index + 1, &mut outcome.report);
        outcome.report.count(class);
        if class != RowClass::Error {
            outcome.validated_rows.push(normalize_row(row, rules));
        }
    }

    tracing::debug!(
        rows = rows.len(),
        ok = outcome.report.rows_ok,
        warnings = outcome.report.rows_with_warnings,
        errors = outcome.report.rows_with_errors,
        "Validated rows"
    );

    outcome
}

fn push_error(report: &mut ValidationReport, row: usize, field: &str, message: &str) -> RowClass {
    report.errors.push(Diagnostic::new(row, field, message));
    RowClass::Error
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

//! Ingestion pipeline: CSV text → raw rows → validated, normalized candidates
//!
//! ```text
//! parse_csv ─► RawRow* ─► validate_row ─► normalize_row ─► CandidateRecord*
//!                             │
//!                             └─► ValidationReport (errors / warnings)
//! ```

pub mod csv;
pub mod normalize;
pub mod row;
pub mod validate;

pub use self::csv::{check_required_headers, csv_quote, parse_csv, CsvTable};
pub use normalize::{default_tag_aliases, normalize_row, normalize_tags, NormalizeRules};
pub use row::{RawRow, REQUIRED_HEADERS};
pub use validate::{
    validate_row, validate_rows, Diagnostic, RowClass, ValidationOutcome, ValidationReport,
};

use crate::Result;

/// Parse CSV text and validate every row
///
/// Structural failures (missing headers, unparseable text) are returned as
/// errors before any row is validated.
pub fn ingest_csv(text: &str, rules: &NormalizeRules) -> Result<ValidationOutcome> {
    let table = parse_csv(text)?;
    Ok(validate_rows(&table.rows, rules))
}

/// Validate rows that arrive already split, together with their header list
///
/// The header check runs first, so a table with no Link column is rejected
/// as a whole instead of yielding one "Link is required" per row.
pub fn validate_table<S: AsRef<str>>(
    headers: &[S],
    rows: &[RawRow],
    rules: &NormalizeRules,
) -> Result<ValidationOutcome> {
    check_required_headers(headers)?;
    Ok(validate_rows(rows, rules))
}

//! CSV ingestion source
//!
//! Turns CSV text into a header list plus [`RawRow`]s. Quoted fields may
//! contain commas, doubled quotes, and newlines; CRLF line endings and a
//! leading byte-order mark are accepted; blank lines are skipped.
//!
//! Anything that prevents a faithful row mapping (no header row, missing
//! required columns, unterminated quote, ragged record) fails the whole
//! table. Nothing is handed to the validator in that case.

use serde::{Deserialize, Serialize};

use super::row::{RawRow, REQUIRED_HEADERS};
use crate::{Error, Result};

/// Parsed table ready for validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Parse CSV text and check the required headers
pub fn parse_csv(text: &str) -> Result<CsvTable> {
    let mut records = split_records(text)?.into_iter();

    let (_, header_fields) = records.next().ok_or_else(|| Error::Csv {
        line: 1,
        message: "empty input, a header row is required".to_string(),
    })?;
    let headers: Vec<String> = header_fields.iter().map(|h| h.trim().to_string()).collect();
    check_required_headers(&headers)?;

    let mut rows: Vec<RawRow> = Vec::new();
    for (line, fields) in records {
        if fields.len() != headers.len() {
            return Err(Error::Csv {
                line,
                message: format!("expected {} fields, found {}", headers.len(), fields.len()),
            });
        }
        rows.push(headers.iter().cloned().zip(fields).collect());
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "Parsed CSV table");
    Ok(CsvTable { headers, rows })
}

/// Fail with the list of required headers that no column matches
pub fn check_required_headers<S: AsRef<str>>(headers: &[S]) -> Result<()> {
    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .filter(|required| {
            !headers
                .iter()
                .any(|h| h.as_ref().trim().eq_ignore_ascii_case(required))
        })
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingHeaders(missing))
    }
}

/// Quote a value for CSV output, doubling embedded quotes
pub fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Records with the 1-based line each one starts on
fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut splitter = RecordSplitter::default();
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        if splitter.in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    splitter.field.push('"');
                }
                '"' => splitter.in_quotes = false,
                '\n' => {
                    splitter.line += 1;
                    splitter.field.push('\n');
                }
                _ => splitter.field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if splitter.field.is_empty() && !splitter.quoted => {
                splitter.in_quotes = true;
                splitter.quoted = true;
            }
            ',' => splitter.end_field(),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => splitter.end_record(),
            _ => splitter.field.push(ch),
        }
    }

    if splitter.in_quotes {
        return Err(Error::Csv {
            line: splitter.record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !splitter.field.is_empty() || !splitter.record.is_empty() || splitter.quoted {
        splitter.end_record();
    }

    Ok(splitter.records)
}

struct RecordSplitter {
    records: Vec<(usize, Vec<String>)>,
    record: Vec<String>,
    field: String,
    in_quotes: bool,
    quoted: bool,
    line: usize,
    record_line: usize,
}

impl Default for RecordSplitter {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            record: Vec::new(),
            field: String::new(),
            in_quotes: false,
            quoted: false,
            line: 1,
            record_line: 1,
        }
    }
}

impl RecordSplitter {
    fn end_field(&mut self) {
        self.record.push(std::mem::take(&mut self.field));
        self.quoted = false;
    }

    fn end_record(&mut self) {
        let blank = self.record.is_empty() && self.field.is_empty() && !self.quoted;
        self.end_field();
        let record = std::mem::take(&mut self.record);
        if !blank {
            self.records.push((self.record_line, record));
        }
        self.line += 1;
        self.record_line = self.line;
    }
}

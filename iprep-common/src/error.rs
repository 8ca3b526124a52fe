//! Common error types for iprep

use thiserror::Error;

/// Common result type for iprep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the iprep crates
///
/// Per-row validation problems are not errors; they are reported as
/// diagnostics in a [`crate::ingest::ValidationReport`].
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Creation over an active record with the same id
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required CSV columns absent from the header row
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    /// Structurally unparseable CSV text
    #[error("CSV parse error at line {line}: {message}")]
    Csv { line: usize, message: String },
}

impl Error {
    /// True for whole-batch ingestion failures (bad header, unparseable text)
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::MissingHeaders(_) | Error::Csv { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_headers_message_names_columns() {
        let err = Error::MissingHeaders(vec!["Title".to_string(), "Link".to_string()]);
        assert_eq!(err.to_string(), "Missing required columns: Title, Link");
        assert!(err.is_structural());
    }

    #[test]
    fn test_conflict_is_not_structural() {
        assert!(!Error::Conflict("42".to_string()).is_structural());
    }
}

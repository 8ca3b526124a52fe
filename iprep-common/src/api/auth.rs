//! Edit-key gate
//!
//! A single static string compared for equality to unlock mutation-capable
//! UI. This is a convenience switch, not an access-control boundary.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Request body for an edit-key check
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EditKeyRequest {
    pub key: String,
}

/// Response body for an edit-key check
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EditKeyResponse {
    pub valid: bool,
}

/// Holds the configured edit key
#[derive(Debug, Clone)]
pub struct EditKeyGate {
    key: String,
}

impl EditKeyGate {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Check a candidate key; an empty candidate is malformed input
    pub fn check(&self, candidate: &str) -> Result<bool> {
        if candidate.is_empty() {
            return Err(Error::InvalidInput("Edit key is required".to_string()));
        }
        Ok(candidate == self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_matches_exactly() {
        let gate = EditKeyGate::new("open-sesame");
        assert!(gate.check("open-sesame").unwrap());
        assert!(!gate.check("Open-Sesame").unwrap());
        assert!(!gate.check("open-sesame ").unwrap());
    }

    #[test]
    fn test_empty_candidate_is_invalid_input() {
        let gate = EditKeyGate::new("k");
        assert!(matches!(gate.check(""), Err(Error::InvalidInput(_))));
    }
}

//! Startup seed load
//!
//! Fills the store from a CSV file through the same parse → validate →
//! normalize → upsert path as an upload. Nothing here stops the server from
//! starting: a missing or structurally broken file is logged and skipped.

use iprep_common::ingest::{ingest_csv, NormalizeRules};
use iprep_common::{ImportResult, ProblemStore};
use std::path::Path;
use tracing::{info, warn};

/// Load `path` into `store`
///
/// Returns `None` when the file was skipped.
pub fn load_seed_csv(
    path: &Path,
    rules: &NormalizeRules,
    store: &mut ProblemStore,
) -> Option<ImportResult> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Seed CSV {} not loaded: {}", path.display(), e);
            return None;
        }
    };

    let outcome = match ingest_csv(&text, rules) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Seed CSV {} rejected: {}", path.display(), e);
            return None;
        }
    };

    for diagnostic in &outcome.report.errors {
        warn!(
            row = diagnostic.row,
            field = %diagnostic.field,
            "Seed row rejected: {}",
            diagnostic.message
        );
    }

    let result = store.upsert_batch(outcome.validated_rows);
    info!(
        added = result.added,
        updated = result.updated,
        skipped = result.skipped,
        "Loaded seed CSV {}",
        path.display()
    );
    Some(result)
}

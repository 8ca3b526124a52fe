//! In-memory problem store
//!
//! Owns identity, create/update/soft-delete, and bulk upsert reconciliation.
//! Records live in insertion order; an id keeps its slot for the life of
//! the store, including after soft-delete. Read paths only ever see active
//! (non-deleted) records.
//!
//! The store itself is not synchronized. Callers that share it across tasks
//! wrap it in a lock, taking the write side for mutations and the read side
//! for queries and analytics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::analytics::{self, DifficultyCount, ProblemStats, TagCount};
use crate::model::{
    canonical_tags, is_absolute_url, CandidateRecord, NewProblem, ProblemPatch, ProblemRecord,
    Status,
};
use crate::query::{self, ProblemFilters, QueryPage};
use crate::{time, Error, Result};

/// Outcome of a bulk upsert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Authoritative collection of problem records
#[derive(Debug, Default)]
pub struct ProblemStore {
    records: Vec<ProblemRecord>,
    index: HashMap<String, usize>,
}

impl ProblemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active records in insertion order
    pub fn active(&self) -> impl Iterator<Item = &ProblemRecord> {
        self.records.iter().filter(|r| !r.deleted)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Filtered, sorted, paginated view of active records
    pub fn query(&self, filters: &ProblemFilters) -> QueryPage {
        query::run(self.active(), filters)
    }

    /// Active record by id; absent and soft-deleted ids both yield `None`
    pub fn get_by_id(&self, id: &str) -> Option<&ProblemRecord> {
        self.slot(id).filter(|r| !r.deleted)
    }

    /// Create a single record
    ///
    /// Fails with [`Error::Conflict`] when an active record already holds the
    /// id. A soft-deleted slot is replaced by a brand-new record.
    pub fn create(&mut self, input: NewProblem) -> Result<ProblemRecord> {
        input.validate()?;
        let id = input.id.trim().to_string();
        if self.get_by_id(&id).is_some() {
            return Err(Error::Conflict(format!("Problem {} already exists", id)));
        }

        let now = time::now();
        let mut record = ProblemRecord {
            id: id.clone(),
            title: input.title.trim().to_string(),
            difficulty: input.difficulty,
            tags: canonical_tags(&input.tags),
            link: input.link.trim().to_string(),
            slug: String::new(),
            search_text: String::new(),
            status: input.status.unwrap_or_default(),
            notes: input.notes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            updated_from_csv: false,
            deleted: false,
        };
        record.refresh_derived();

        self.put(record.clone());
        info!(id = %id, "Problem created");
        Ok(record)
    }

    /// Apply a partial patch to an active record
    ///
    /// Returns `None` for absent or soft-deleted ids; deleted records are
    /// never resurrected here. The patch is expected to be validated by the
    /// caller ([`ProblemPatch::validate`]).
    pub fn update(&mut self, id: &str, patch: ProblemPatch) -> Option<ProblemRecord> {
        let record = self.active_slot_mut(id)?;
        let refresh = patch.touches_derived();

        if let Some(title) = patch.title {
            record.title = title.trim().to_string();
        }
        if let Some(difficulty) = patch.difficulty {
            record.difficulty = difficulty;
        }
        if let Some(tags) = patch.tags {
            record.tags = canonical_tags(&tags);
        }
        if let Some(link) = patch.link {
            record.link = link.trim().to_string();
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(notes) = patch.notes {
            record.notes = notes;
        }
        if refresh {
            record.refresh_derived();
        }
        record.updated_at = time::now();

        debug!(id = %id, status = %record.status, "Problem updated");
        Some(record.clone())
    }

    /// Soft-delete; false when the id is absent or already deleted
    pub fn delete(&mut self, id: &str) -> bool {
        match self.active_slot_mut(id) {
            Some(record) => {
                record.deleted = true;
                record.updated_at = time::now();
                info!(id = %id, "Problem soft-deleted");
                true
            }
            None => false,
        }
    }

    /// Bulk insert-or-merge, processed in input order
    ///
    /// Merging into an active record overwrites only the import-owned fields
    /// (title, difficulty, tags, link and the derived slug/search text),
    /// keeps status, notes and created_at, and marks the record as touched
    /// by import. Anything else, including a soft-deleted slot, becomes a
    /// fresh record. A candidate that cannot be processed is skipped and
    /// reported without affecting the rest of the batch.
    pub fn upsert_batch(&mut self, candidates: Vec<CandidateRecord>) -> ImportResult {
        self.upsert_entries(candidates.into_iter().map(Ok))
    }

    /// [`ProblemStore::upsert_batch`] over records as a caller posted them
    ///
    /// Each record is decoded on its own; one that is not a well-formed
    /// candidate (missing field, unknown difficulty) is skipped and reported
    /// while the rest of the batch is still applied.
    pub fn upsert_values(&mut self, records: Vec<Value>) -> ImportResult {
        self.upsert_entries(records.into_iter().map(decode_candidate))
    }

    pub fn summary_stats(&self) -> ProblemStats {
        analytics::summary_stats(self.active())
    }

    pub fn difficulty_distribution(&self) -> Vec<DifficultyCount> {
        analytics::difficulty_distribution(self.active())
    }

    pub fn tag_distribution(&self) -> Vec<TagCount> {
        analytics::tag_distribution(self.active(), analytics::TOP_TAGS)
    }

    fn upsert_entries<I>(&mut self, entries: I) -> ImportResult
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut result = ImportResult::default();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (position, entry) in entries.into_iter().enumerate() {
            let candidate = match entry.and_then(check_candidate) {
                Ok(candidate) => candidate,
                Err(Rejected { id, reason }) => {
                    warn!(id = %id, row = position + 1, reason = %reason, "Skipping import record");
                    result.errors.push(format!("Failed to process problem {}: {}", id, reason));
                    result.skipped += 1;
                    continue;
                }
            };

            if let Some(first) = seen.insert(candidate.id.clone(), position + 1) {
                result.warnings.push(format!(
                    "Problem {} appears more than once in batch (rows {} and {}); later row merged",
                    candidate.id,
                    first,
                    position + 1
                ));
            }

            if self.merge(&candidate) {
                result.updated += 1;
            } else {
                self.put(fresh_record(candidate));
                result.added += 1;
            }
        }

        info!(
            added = result.added,
            updated = result.updated,
            skipped = result.skipped,
            "Bulk upsert completed"
        );
        result
    }

    /// Merge into an active record with the candidate's id, if there is one
    fn merge(&mut self, candidate: &CandidateRecord) -> bool {
        let Some(record) = self.active_slot_mut(&candidate.id) else {
            return false;
        };
        record.title = candidate.title.clone();
        record.difficulty = candidate.difficulty;
        record.tags = candidate.tags.clone();
        record.link = candidate.link.clone();
        record.refresh_derived();
        record.updated_at = time::now();
        record.updated_from_csv = true;
        true
    }

    fn slot(&self, id: &str) -> Option<&ProblemRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    fn active_slot_mut(&mut self, id: &str) -> Option<&mut ProblemRecord> {
        let i = *self.index.get(id)?;
        Some(&mut self.records[i]).filter(|r| !r.deleted)
    }

    /// Insert a record, reusing the id's slot when one exists
    fn put(&mut self, record: ProblemRecord) {
        match self.index.get(&record.id) {
            Some(&i) => self.records[i] = record,
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }
}

/// A batch entry that cannot be applied
struct Rejected {
    id: String,
    reason: String,
}

impl Rejected {
    fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

type Entry = std::result::Result<CandidateRecord, Rejected>;

fn decode_candidate(value: Value) -> Entry {
    let id = match value.get("id") {
        Some(Value::String(id)) => id.trim().to_string(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    };
    serde_json::from_value(value).map_err(|e| Rejected::new(id, e.to_string()))
}

/// Reject candidates that could not have come out of the validator
fn check_candidate(mut candidate: CandidateRecord) -> Entry {
    candidate.id = candidate.id.trim().to_string();
    candidate.title = candidate.title.trim().to_string();
    candidate.link = candidate.link.trim().to_string();

    if candidate.id.is_empty() {
        return Err(Rejected::new(candidate.id, "ID is required"));
    }
    if candidate.title.is_empty() {
        return Err(Rejected::new(candidate.id, "Title is required"));
    }
    if !is_absolute_url(&candidate.link) {
        return Err(Rejected::new(candidate.id, "Invalid URL format"));
    }

    candidate.tags = canonical_tags(&candidate.tags);
    Ok(candidate)
}

fn fresh_record(candidate: CandidateRecord) -> ProblemRecord {
    let now = time::now();
    let mut record = ProblemRecord {
        id: candidate.id,
        title: candidate.title,
        difficulty: candidate.difficulty,
        tags: candidate.tags,
        link: candidate.link,
        slug: String::new(),
        search_text: String::new(),
        status: Status::NotPrepared,
        notes: String::new(),
        created_at: now,
        updated_at: now,
        updated_from_csv: false,
        deleted: false,
    };
    record.refresh_derived();
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use serde_json::json;

    fn candidate(id: &str, title: &str) -> CandidateRecord {
        CandidateRecord::new(
            id,
            title,
            Difficulty::Easy,
            vec!["Array".to_string()],
            format!("https://x.com/{}", id),
        )
    }

    fn new_problem(id: &str) -> NewProblem {
        NewProblem {
            id: id.to_string(),
            title: format!("Problem {}", id),
            difficulty: Difficulty::Medium,
            tags: vec!["Graph".to_string(), "BFS".to_string()],
            link: format!("https://x.com/{}", id),
            status: None,
            notes: None,
        }
    }

    #[test]
    fn test_create_defaults_and_derived_fields() {
        let mut store = ProblemStore::new();
        let record = store.create(new_problem("1")).unwrap();
        assert_eq!(record.status, Status::NotPrepared);
        assert_eq!(record.notes, "");
        assert_eq!(record.tags, vec!["BFS", "Graph"]);
        assert_eq!(record.slug, "problem-1");
        assert_eq!(record.search_text, "problem 1 bfs graph");
        assert!(!record.updated_from_csv);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_create_conflicts_on_active_id() {
        let mut store = ProblemStore::new();
        store.create(new_problem("1")).unwrap();
        assert!(matches!(store.create(new_problem("1")), Err(Error::Conflict(_))));
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let mut store = ProblemStore::new();
        let mut input = new_problem("1");
        input.link = "ftp-ish nonsense".to_string();
        assert!(matches!(store.create(input), Err(Error::InvalidInput(_))));
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn test_create_over_deleted_id_is_fresh() {
        let mut store = ProblemStore::new();
        store.create(new_problem("1")).unwrap();
        store.update("1", ProblemPatch { notes: Some("old".into()), ..Default::default() });
        assert!(store.delete("1"));
        let record = store.create(new_problem("1")).unwrap();
        assert_eq!(record.notes, "");
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_update_patch_and_refresh() {
        let mut store = ProblemStore::new();
        let created = store.create(new_problem("1")).unwrap();
        let patch = ProblemPatch {
            title: Some("Word Ladder".into()),
            status: Some(Status::InProgress),
            ..Default::default()
        };
        let updated = store.update("1", patch).unwrap();
        assert_eq!(updated.title, "Word Ladder");
        assert_eq!(updated.slug, "word-ladder");
        assert_eq!(updated.search_text, "word ladder bfs graph");
        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_missing_or_deleted_is_none() {
        let mut store = ProblemStore::new();
        assert!(store.update("nope", ProblemPatch::default()).is_none());
        store.create(new_problem("1")).unwrap();
        store.delete("1");
        assert!(store.update("1", ProblemPatch::default()).is_none());
        assert!(store.get_by_id("1").is_none());
    }

    #[test]
    fn test_delete_reports_false_on_repeat() {
        let mut store = ProblemStore::new();
        store.create(new_problem("1")).unwrap();
        assert!(store.delete("1"));
        assert!(!store.delete("1"));
        assert!(!store.delete("2"));
    }

    #[test]
    fn test_upsert_adds_then_merges() {
        let mut store = ProblemStore::new();
        let batch = || vec![candidate("1", "Two Sum"), candidate("2", "Add Two Numbers")];
        let first = store.upsert_batch(batch());
        assert_eq!((first.added, first.updated, first.skipped), (2, 0, 0));
        assert!(!store.get_by_id("1").unwrap().updated_from_csv);

        let second = store.upsert_batch(batch());
        assert_eq!((second.added, second.updated, second.skipped), (0, 2, 0));
        assert!(store.get_by_id("1").unwrap().updated_from_csv);
    }

    #[test]
    fn test_upsert_preserves_user_fields() {
        let mut store = ProblemStore::new();
        store.upsert_batch(vec![candidate("1", "Two Sum")]);
        let before = store
            .update(
                "1",
                ProblemPatch {
                    status: Some(Status::Prepared),
                    notes: Some("foo".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        store.upsert_batch(vec![candidate("1", "Two Sum II")]);
        let after = store.get_by_id("1").unwrap();
        assert_eq!(after.title, "Two Sum II");
        assert_eq!(after.slug, "two-sum-ii");
        assert_eq!(after.search_text, "two sum ii array");
        assert_eq!(after.status, Status::Prepared);
        assert_eq!(after.notes, "foo");
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_upsert_over_deleted_slot_starts_fresh() {
        let mut store = ProblemStore::new();
        store.upsert_batch(vec![candidate("1", "Two Sum")]);
        store.update("1", ProblemPatch { notes: Some("keep?".into()), ..Default::default() });
        store.delete("1");

        let result = store.upsert_batch(vec![candidate("1", "Two Sum")]);
        assert_eq!(result.added, 1);
        let record = store.get_by_id("1").unwrap();
        assert_eq!(record.notes, "");
        assert_eq!(record.status, Status::NotPrepared);
        assert!(!record.updated_from_csv);
    }

    #[test]
    fn test_upsert_skips_bad_record_and_continues() {
        let mut store = ProblemStore::new();
        let mut bad = candidate("2", "Broken");
        bad.link = "not a url".to_string();
        let result = store.upsert_batch(vec![candidate("1", "A"), bad, candidate("3", "C")]);
        assert_eq!((result.added, result.updated, result.skipped), (2, 0, 1));
        assert_eq!(result.errors, vec!["Failed to process problem 2: Invalid URL format"]);
        assert!(store.get_by_id("2").is_none());
        assert!(store.get_by_id("3").is_some());
    }

    #[test]
    fn test_upsert_recomputes_derived_fields() {
        let mut store = ProblemStore::new();
        let mut tampered = candidate("1", "Valid Parentheses");
        tampered.slug = "something-else".to_string();
        tampered.search_text = "bogus".to_string();
        store.upsert_batch(vec![tampered]);
        let record = store.get_by_id("1").unwrap();
        assert_eq!(record.slug, "valid-parentheses");
        assert_eq!(record.search_text, "valid parentheses array");
    }

    #[test]
    fn test_duplicate_ids_in_batch_warn_and_merge() {
        let mut store = ProblemStore::new();
        let result = store.upsert_batch(vec![candidate("1", "First"), candidate("1", "Second")]);
        assert_eq!((result.added, result.updated), (1, 1));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(store.get_by_id("1").unwrap().title, "Second");
    }

    #[test]
    fn test_upsert_values_skips_undecodable_records() {
        let mut store = ProblemStore::new();
        let records = vec![
            json!({"id": "1", "title": "Two Sum", "difficulty": "Easy", "link": "https://x.com/1"}),
            json!({"id": "2", "title": "No Link", "difficulty": "Hard"}),
            json!({"id": 3, "title": "Odd", "difficulty": "Extreme", "link": "https://x.com/3"}),
            json!({"id": "4", "title": "Tagged", "difficulty": "Medium", "tags": ["Tree"],
                   "link": "https://x.com/4"}),
        ];

        let result = store.upsert_values(records);
        assert_eq!((result.added, result.updated, result.skipped), (2, 0, 2));
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].starts_with("Failed to process problem 2: missing field"));
        assert!(result.errors[1].starts_with("Failed to process problem 3: "));
        assert_eq!(store.get_by_id("1").unwrap().slug, "two-sum");
        assert_eq!(store.get_by_id("4").unwrap().tags, vec!["Tree"]);
        assert!(store.get_by_id("2").is_none());
    }
}

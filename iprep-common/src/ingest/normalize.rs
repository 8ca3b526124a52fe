//! Row normalizer
//!
//! Pure, total mapping from a [`RawRow`] to a [`CandidateRecord`]. Absent
//! fields become empty strings or an empty tag list; nothing here fails.

use std::collections::BTreeMap;

use super::row::{RawRow, FIELD_DIFFICULTY, FIELD_ID, FIELD_LINK, FIELD_TAGS, FIELD_TITLE};
use crate::model::{canonical_tags, CandidateRecord, Difficulty};

/// Tag rewrites applied at the single normalization boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeRules {
    /// Exact tag (after trimming) → replacement
    pub tag_aliases: BTreeMap<String, String>,
}

impl Default for NormalizeRules {
    fn default() -> Self {
        Self {
            tag_aliases: default_tag_aliases(),
        }
    }
}

impl NormalizeRules {
    /// Rules with no tag rewrites
    pub fn none() -> Self {
        Self {
            tag_aliases: BTreeMap::new(),
        }
    }

    pub fn with_aliases(tag_aliases: BTreeMap<String, String>) -> Self {
        Self { tag_aliases }
    }

    fn rewrite<'a>(&'a self, tag: &'a str) -> &'a str {
        self.tag_aliases.get(tag).map(String::as_str).unwrap_or(tag)
    }
}

/// Built-in tag aliases
pub fn default_tag_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([("Dynamic Programming".to_string(), "DP".to_string())])
}

/// Normalize one raw row into an import candidate
pub fn normalize_row(row: &RawRow, rules: &NormalizeRules) -> CandidateRecord {
    CandidateRecord::new(
        row.field(FIELD_ID).trim(),
        row.field(FIELD_TITLE).trim(),
        Difficulty::normalize(row.field(FIELD_DIFFICULTY)),
        normalize_tags(row.field(FIELD_TAGS), rules),
        row.field(FIELD_LINK).trim(),
    )
}

/// Split a free-text tag list on `,` or `;`, rewrite aliases, canonicalize
pub fn normalize_tags(raw: &str, rules: &NormalizeRules) -> Vec<String> {
    canonical_tags(
        raw.split(|c: char| c == ',' || c == ';')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(|tag| rules.rewrite(tag)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sum_row() -> RawRow {
        RawRow::new()
            .with("ID", "1")
            .with("Title", " Two Sum ")
            .with("Difficulty", "EASY")
            .with("Tags", "Array, Hash Table")
            .with("Link", "https://x.com/1")
    }

    #[test]
    fn test_normalize_two_sum() {
        let candidate = normalize_row(&two_sum_row(), &NormalizeRules::default());
        assert_eq!(candidate.id, "1");
        assert_eq!(candidate.title, "Two Sum");
        assert_eq!(candidate.difficulty, Difficulty::Easy);
        assert_eq!(candidate.tags, vec!["Array", "Hash Table"]);
        assert_eq!(candidate.link, "https://x.com/1");
        assert_eq!(candidate.slug, "two-sum");
        assert_eq!(candidate.search_text, "two sum array hash table");
    }

    #[test]
    fn test_lowercase_headers_are_found() {
        let row = RawRow::new().with("id", " 42 ").with("title", "Trapping Rain Water");
        let candidate = normalize_row(&row, &NormalizeRules::default());
        assert_eq!(candidate.id, "42");
        assert_eq!(candidate.title, "Trapping Rain Water");
        assert_eq!(candidate.difficulty, Difficulty::Unknown);
        assert!(candidate.tags.is_empty());
        assert_eq!(candidate.link, "");
    }

    #[test]
    fn test_tags_split_on_comma_and_semicolon() {
        let tags = normalize_tags("String; Two Pointers,  ,Array;", &NormalizeRules::none());
        assert_eq!(tags, vec!["Array", "String", "Two Pointers"]);
    }

    #[test]
    fn test_dynamic_programming_alias_applies() {
        let tags = normalize_tags("Dynamic Programming, Array", &NormalizeRules::default());
        assert_eq!(tags, vec!["Array", "DP"]);

        let untouched = normalize_tags("Dynamic Programming", &NormalizeRules::none());
        assert_eq!(untouched, vec!["Dynamic Programming"]);
    }

    #[test]
    fn test_alias_collapses_with_existing_tag() {
        let tags = normalize_tags("DP; Dynamic Programming", &NormalizeRules::default());
        assert_eq!(tags, vec!["DP"]);
    }
}

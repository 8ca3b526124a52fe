//! Problem record model and derived-field helpers
//!
//! A [`ProblemRecord`] is the canonical unit stored by the problem store.
//! `slug` and `search_text` are never accepted from callers; they are always
//! recomputed from `title` and `tags` by the helpers in this module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

// ========================================
// Enumerations
// ========================================

/// Problem difficulty (closed set)
///
/// Unrecognized input is coerced to `Unknown` by [`Difficulty::normalize`],
/// never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown,
}

impl Difficulty {
    /// Lenient mapping used at the ingestion boundary
    ///
    /// Case and surrounding whitespace are ignored; `"med"` is accepted as
    /// an alias for Medium. Anything else maps to `Unknown`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" | "med" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse (exact display name), used for query filters
impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            "Unknown" => Ok(Difficulty::Unknown),
            other => Err(Error::InvalidInput(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// Preparation status, owned by user edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "Not Prepared")]
    NotPrepared,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Prepared")]
    Prepared,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotPrepared => "Not Prepared",
            Status::InProgress => "In Progress",
            Status::Prepared => "Prepared",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Not Prepared" => Ok(Status::NotPrepared),
            "In Progress" => Ok(Status::InProgress),
            "Prepared" => Ok(Status::Prepared),
            other => Err(Error::InvalidInput(format!("Unknown status: {}", other))),
        }
    }
}

// ========================================
// Records
// ========================================

/// Stored problem record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub link: String,
    pub slug: String,
    pub search_text: String,
    pub status: Status,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_from_csv: bool,
    pub deleted: bool,
}

impl ProblemRecord {
    /// Recompute `slug` and `search_text` after `title` or `tags` changed
    pub(crate) fn refresh_derived(&mut self) {
        self.slug = slugify(&self.title);
        self.search_text = search_text(&self.title, &self.tags);
    }
}

/// Normalized, import-ready record produced by the ingestion pipeline
///
/// Carries only import-owned fields. `status` and `notes` are not part of a
/// candidate, so a merge can never touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub link: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub search_text: String,
}

impl CandidateRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        difficulty: Difficulty,
        tags: Vec<String>,
        link: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            slug: slugify(&title),
            search_text: search_text(&title, &tags),
            title,
            difficulty,
            tags,
            link: link.into(),
        }
    }
}

/// Input for a single explicit creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProblem {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub link: String,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewProblem {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("id", &self.id)?;
        require_non_empty("title", &self.title)?;
        require_absolute_url(&self.link)
    }
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemPatch {
    pub title: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
    pub link: Option<String>,
    pub status: Option<Status>,
    pub notes: Option<String>,
}

impl ProblemPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_non_empty("title", title)?;
        }
        if let Some(link) = &self.link {
            require_absolute_url(link)?;
        }
        Ok(())
    }

    /// True when the patch touches a field that feeds `slug`/`search_text`
    pub(crate) fn touches_derived(&self) -> bool {
        self.title.is_some() || self.tags.is_some()
    }
}

// ========================================
// Derived fields
// ========================================

/// URL-safe slug: lowercase ASCII alphanumerics, every other run collapsed
/// to a single hyphen, no leading or trailing hyphen
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Lowercase title followed by each tag, space separated
pub fn search_text(title: &str, tags: &[String]) -> String {
    let mut text = title.to_lowercase();
    for tag in tags {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&tag.to_lowercase());
    }
    text
}

/// Canonical tag list: trimmed, empties dropped, sorted, deduplicated
pub fn canonical_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = tags
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// True when `link` parses as an absolute URL
pub fn is_absolute_url(link: &str) -> bool {
    url::Url::parse(link.trim()).is_ok()
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

fn require_absolute_url(link: &str) -> Result<()> {
    if link.trim().is_empty() {
        return Err(Error::InvalidInput("link is required".to_string()));
    }
    if !is_absolute_url(link) {
        return Err(Error::InvalidInput(format!("Invalid URL format: {}", link)));
    }
    Ok(())
}

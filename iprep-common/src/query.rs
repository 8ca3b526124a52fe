//! Query engine: filter, search, sort, paginate
//!
//! Operates on whatever record iterator the store hands it (always the
//! active subset). Filter shape is validated when [`ProblemQuery`] is
//! converted into [`ProblemFilters`]; the engine itself never coerces.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::model::{Difficulty, ProblemRecord, Status};
use crate::{Error, Result};

/// Default page size
pub const DEFAULT_LIMIT: usize = 50;
/// Largest accepted page size
pub const MAX_LIMIT: usize = 100;

/// Sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Id,
    Title,
    Difficulty,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(SortBy::Id),
            "title" => Ok(SortBy::Title),
            "difficulty" => Ok(SortBy::Difficulty),
            "status" => Ok(SortBy::Status),
            "createdAt" => Ok(SortBy::CreatedAt),
            "updatedAt" => Ok(SortBy::UpdatedAt),
            other => Err(Error::InvalidInput(format!("Unknown sort key: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::InvalidInput(format!("Unknown sort order: {}", other))),
        }
    }
}

/// Validated filter, sort, and page specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemFilters {
    pub search: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<Status>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// 1-based
    pub page: usize,
    pub limit: usize,
}

impl Default for ProblemFilters {
    fn default() -> Self {
        Self {
            search: None,
            difficulty: None,
            status: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProblemFilters {
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(Error::InvalidInput("page must be at least 1".to_string()));
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            let message = format!("limit must be between 1 and {}", MAX_LIMIT);
            return Err(Error::InvalidInput(message));
        }
        Ok(())
    }
}

/// Loosely-typed query parameters as they arrive from a caller
///
/// Empty strings mean "unset", matching how list views clear a filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemQuery {
    pub search: Option<String>,
    pub difficulty: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TryFrom<ProblemQuery> for ProblemFilters {
    type Error = Error;

    fn try_from(query: ProblemQuery) -> Result<Self> {
        let defaults = ProblemFilters::default();
        let page = query.page.unwrap_or(1);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT as i64);
        if page < 1 {
            return Err(Error::InvalidInput("page must be at least 1".to_string()));
        }
        if limit < 1 {
            let message = format!("limit must be between 1 and {}", MAX_LIMIT);
            return Err(Error::InvalidInput(message));
        }

        let filters = ProblemFilters {
            search: non_empty(query.search),
            difficulty: non_empty(query.difficulty).map(|d| d.parse()).transpose()?,
            status: non_empty(query.status).map(|s| s.parse()).transpose()?,
            sort_by: non_empty(query.sort_by)
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(defaults.sort_by),
            sort_order: non_empty(query.sort_order)
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(defaults.sort_order),
            page: usize::try_from(page).map_err(|_| out_of_range("page"))?,
            limit: usize::try_from(limit).map_err(|_| out_of_range("limit"))?,
        };
        filters.validate()?;
        Ok(filters)
    }
}

/// One page of results plus the pre-pagination match count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryPage {
    pub problems: Vec<ProblemRecord>,
    pub total: usize,
}

/// Run a query over `records`
pub fn run<'a, I>(records: I, filters: &ProblemFilters) -> QueryPage
where
    I: IntoIterator<Item = &'a ProblemRecord>,
{
    let needle = filters.search.as_deref().map(str::to_lowercase);

    let mut matches: Vec<&ProblemRecord> = records
        .into_iter()
        .filter(|r| match &needle {
            Some(n) => r.search_text.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .filter(|r| filters.difficulty.map_or(true, |d| r.difficulty == d))
        .filter(|r| filters.status.map_or(true, |s| r.status == s))
        .collect();

    // Stable sort: ties keep insertion order in both directions
    matches.sort_by(|a, b| {
        let ordering = compare(a, b, filters.sort_by);
        match filters.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = matches.len();
    let start = filters.page.saturating_sub(1).saturating_mul(filters.limit);
    let problems = matches
        .into_iter()
        .skip(start)
        .take(filters.limit)
        .cloned()
        .collect();

    QueryPage { problems, total }
}

fn compare(a: &ProblemRecord, b: &ProblemRecord, key: SortBy) -> Ordering {
    match key {
        SortBy::Id => leading_int(&a.id).cmp(&leading_int(&b.id)),
        SortBy::Title => a.title.cmp(&b.title),
        SortBy::Difficulty => a.difficulty.as_str().cmp(b.difficulty.as_str()),
        SortBy::Status => a.status.as_str().cmp(b.status.as_str()),
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// Integer value of the id's leading digits (optional sign allowed), or 0
///
/// `"9"` < `"10"`; `"12abc"` sorts as 12; `"abc"` sorts as 0.
pub fn leading_int(id: &str) -> i64 {
    let s = id.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn out_of_range(param: &str) -> Error {
    Error::InvalidInput(format!("{} out of range", param))
}

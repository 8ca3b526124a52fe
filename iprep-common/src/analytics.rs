//! Summary analytics over active records
//!
//! Recomputed on every call; nothing is cached.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Difficulty, ProblemRecord, Status};

/// Number of tags reported by [`tag_distribution`] through the store
pub const TOP_TAGS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStats {
    pub total: usize,
    pub prepared: usize,
    pub in_progress: usize,
    pub not_prepared: usize,
    /// Rounded percentage of prepared records; 0 when there are none
    pub percentage_prepared: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: Difficulty,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

pub fn summary_stats<'a, I>(records: I) -> ProblemStats
where
    I: IntoIterator<Item = &'a ProblemRecord>,
{
    let mut stats = ProblemStats::default();
    for record in records {
        stats.total += 1;
        match record.status {
            Status::Prepared => stats.prepared += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::NotPrepared => stats.not_prepared += 1,
        }
    }
    stats.percentage_prepared = percentage(stats.prepared, stats.total);
    stats
}

/// Count per difficulty, in order of first occurrence
pub fn difficulty_distribution<'a, I>(records: I) -> Vec<DifficultyCount>
where
    I: IntoIterator<Item = &'a ProblemRecord>,
{
    let mut counts: Vec<DifficultyCount> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|c| c.difficulty == record.difficulty) {
            Some(entry) => entry.count += 1,
            None => counts.push(DifficultyCount {
                difficulty: record.difficulty,
                count: 1,
            }),
        }
    }
    counts
}

/// Most frequent tags, descending by count, ties in first-seen order
pub fn tag_distribution<'a, I>(records: I, limit: usize) -> Vec<TagCount>
where
    I: IntoIterator<Item = &'a ProblemRecord>,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagCount> = Vec::new();

    for record in records {
        for tag in &record.tags {
            match positions.get(tag.as_str()) {
                Some(&i) => counts[i].count += 1,
                None => {
                    positions.insert(tag.as_str(), counts.len());
                    counts.push(TagCount {
                        tag: tag.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * part as f64 / total as f64).round() as u32
}

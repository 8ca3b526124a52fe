//! Raw, loosely-typed tabular row
//!
//! Field names keep whatever casing the source used; lookups go through
//! [`RawRow::get`], which matches case-insensitively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Logical field names of an ingested problem row
pub const FIELD_ID: &str = "ID";
pub const FIELD_TITLE: &str = "Title";
pub const FIELD_DIFFICULTY: &str = "Difficulty";
pub const FIELD_TAGS: &str = "Tags";
pub const FIELD_LINK: &str = "Link";

/// Headers that every ingested table must carry (matched case-insensitively)
pub const REQUIRED_HEADERS: [&str; 5] =
    [FIELD_ID, FIELD_TITLE, FIELD_DIFFICULTY, FIELD_TAGS, FIELD_LINK];

/// One raw record: ordered `(field name, value)` pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; earlier fields win on case-insensitive collisions
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Builder-style [`RawRow::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Case-insensitive lookup; first matching field wins
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Lookup that treats an absent field as the empty string
    pub fn field(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Field names in source order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// JSON objects arrive from HTTP callers; scalar values are stringified so
/// numeric ids like `17` become `"17"`. Nulls count as absent. Keys keep the
/// order they were posted in (serde_json `preserve_order`).
impl From<Map<String, Value>> for RawRow {
    fn from(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(s) => s,
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    other => other.to_string(),
                };
                Some((key, text))
            })
            .collect();
        Self { fields }
    }
}

impl From<RawRow> for Map<String, Value> {
    fn from(row: RawRow) -> Self {
        let mut map = Map::new();
        for (key, value) in row.fields {
            map.entry(key).or_insert(Value::String(value));
        }
        map
    }
}

//! Flat CSV export of active records

use crate::ingest::csv_quote;
use crate::model::ProblemRecord;

pub const EXPORT_HEADER: &str = "ID,Title,Difficulty,Tags,Link,Status,Notes";

/// Suggested download name for [`export_csv`] output
pub const EXPORT_FILENAME: &str = "problems_export.csv";

/// Header row plus one fully-quoted row per record; tags joined with `"; "`
pub fn export_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ProblemRecord>,
{
    let mut lines = vec![EXPORT_HEADER.to_string()];
    for record in records {
        let tags = record.tags.join("; ");
        let fields = [
            record.id.as_str(),
            record.title.as_str(),
            record.difficulty.as_str(),
            tags.as_str(),
            record.link.as_str(),
            record.status.as_str(),
            record.notes.as_str(),
        ];
        lines.push(fields.iter().map(|f| csv_quote(f)).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{parse_csv, RawRow};
    use crate::model::{CandidateRecord, Difficulty, ProblemPatch, Status};
    use crate::store::ProblemStore;

    #[test]
    fn test_export_empty_store_is_header_only() {
        let store = ProblemStore::new();
        assert_eq!(export_csv(store.active()), EXPORT_HEADER);
    }

    #[test]
    fn test_export_rows() {
        let mut store = ProblemStore::new();
        store.upsert_batch(vec![
            CandidateRecord::new(
                "1",
                "Two Sum",
                Difficulty::Easy,
                vec!["Array".into(), "Hash Table".into()],
                "https://x.com/1",
            ),
            CandidateRecord::new("2", "Gone", Difficulty::Hard, vec![], "https://x.com/2"),
        ]);
        store.update(
            "1",
            ProblemPatch {
                status: Some(Status::Prepared),
                notes: Some("use a \"seen\" map".into()),
                ..Default::default()
            },
        );
        store.delete("2");

        let csv = export_csv(store.active());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        let expected = concat!(
            r#""1","Two Sum","Easy","Array; Hash Table","https://x.com/1","#,
            r#""Prepared","use a ""seen"" map""#
        );
        assert_eq!(lines[1], expected);
    }

    #[test]
    fn test_export_reparses_as_csv() {
        let mut store = ProblemStore::new();
        store.upsert_batch(vec![CandidateRecord::new(
            "5",
            "Longest, Palindromic Substring",
            Difficulty::Medium,
            vec!["DP".into(), "String".into()],
            "https://x.com/5",
        )]);
        let table = parse_csv(&export_csv(store.active())).unwrap();
        let row: &RawRow = &table.rows[0];
        assert_eq!(row.get("Title"), Some("Longest, Palindromic Substring"));
        assert_eq!(row.get("Tags"), Some("DP; String"));
        assert_eq!(row.get("Status"), Some("Not Prepared"));
    }
}

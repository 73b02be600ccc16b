use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};
use crate::page::ResultRecord;

/// A search hit tagged with the query that produced it. Field order is the
/// CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultRow {
    pub query: String,
    pub title: Option<String>,
    pub publication: Option<String>,
    pub excerpt: Option<String>,
}

impl ResultRow {
    pub fn from_record(query: &str, record: ResultRecord) -> Self {
        Self {
            query: query.to_owned(),
            title: record.title,
            publication: record.publication,
            excerpt: record.excerpt,
        }
    }
}

/// Ordered rows; the row position is the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(query: &str, records: impl IntoIterator<Item = ResultRecord>) -> Self {
        Self {
            rows: records
                .into_iter()
                .map(|record| ResultRow::from_record(query, record))
                .collect(),
        }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row concatenation.
    pub fn append(&mut self, other: ResultTable) {
        self.rows.extend(other.rows);
    }

    /// Drops rows equal to an earlier row, keeping first-seen order.
    /// Returns how many rows were removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// `existing` rows first, then `new`, deduplicated.
    pub fn merge(existing: ResultTable, new: ResultTable) -> ResultTable {
        let mut merged = existing;
        merged.append(new);
        merged.dedup();
        merged
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|err| ScrapeError::persistence("open", path, err))?;
        let rows = reader
            .deserialize::<ResultRow>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| ScrapeError::persistence("read", path, err))?;
        Ok(Self { rows })
    }

    /// Overwrites `path` with the whole table, header row included.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        crate::persist::write_atomic(path, |file| {
            let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(file);
            if self.rows.is_empty() {
                writer.write_record(["query", "title", "publication", "excerpt"])?;
            }
            for row in &self.rows {
                writer.serialize(row)?;
            }
            writer.flush()
        })
    }
}

impl FromIterator<ResultRow> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ResultRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(query: &str, title: &str) -> ResultRow {
        ResultRow {
            query: query.to_owned(),
            title: Some(title.to_owned()),
            publication: None,
            excerpt: Some(format!("excerpt of {title}")),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let mut table: ResultTable = [row("q", "a"), row("q", "b"), row("q", "a"), row("r", "a")]
            .into_iter()
            .collect();

        assert_eq!(table.dedup(), 1);
        assert_eq!(
            table.rows(),
            &[row("q", "a"), row("q", "b"), row("r", "a")]
        );
    }

    #[test]
    fn merge_appends_new_rows_after_existing() {
        let existing: ResultTable = [row("q", "a"), row("q", "b")].into_iter().collect();
        let new: ResultTable = [row("q", "b"), row("q", "c")].into_iter().collect();

        let merged = ResultTable::merge(existing, new);
        assert_eq!(
            merged.rows(),
            &[row("q", "a"), row("q", "b"), row("q", "c")]
        );
    }

    #[test]
    fn csv_round_trip_preserves_missing_fields() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("series.csv");
        let table: ResultTable = [
            row("q", "a, with comma"),
            ResultRow {
                query: "q".to_owned(),
                title: None,
                publication: Some("Pub \"quoted\"\nsecond line".to_owned()),
                excerpt: None,
            },
        ]
        .into_iter()
        .collect();

        table.write_csv(&path)?;
        let header = std::fs::read_to_string(&path)?;
        assert!(header.starts_with("query,title,publication,excerpt\n"));

        assert_eq!(ResultTable::read_csv(&path)?, table);
        Ok(())
    }

    #[test]
    fn empty_table_still_writes_header() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("empty.csv");
        ResultTable::new().write_csv(&path)?;
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "query,title,publication,excerpt\n"
        );
        assert!(ResultTable::read_csv(&path)?.is_empty());
        Ok(())
    }
}

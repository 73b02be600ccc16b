use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::table::ResultTable;

/// Cumulative result tables keyed by canonical series slug, mirrored to
/// `<out_dir>/<slug>.csv` when an output directory is set.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    tables: HashMap<String, ResultTable>,
    out_dir: Option<PathBuf>,
}

impl SeriesStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_out_dir(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            tables: HashMap::new(),
            out_dir: Some(out_dir.into()),
        }
    }

    pub fn csv_path(&self, slug: &str) -> Option<PathBuf> {
        self.out_dir
            .as_ref()
            .map(|dir| dir.join(format!("{slug}.csv")))
    }

    pub fn get(&self, slug: &str) -> Option<&ResultTable> {
        self.tables.get(slug)
    }

    /// Appends `new` after the rows already held for `slug` (read from disk
    /// the first time the slug is seen), deduplicates, and writes the whole
    /// table back. Returns how many rows the table grew by.
    pub fn merge(&mut self, slug: &str, new: ResultTable) -> Result<usize> {
        let mut existing = match self.tables.remove(slug) {
            Some(table) => table,
            None => self.load_existing(slug)?,
        };
        let dropped = existing.dedup();
        if dropped > 0 {
            tracing::debug!(slug, dropped, "dropped duplicate rows already on disk");
        }
        let before = existing.len();
        let merged = ResultTable::merge(existing, new);
        let added = merged.len() - before;

        if let Some(path) = self.csv_path(slug) {
            merged.write_csv(&path)?;
            tracing::info!(
                slug,
                rows = merged.len(),
                added,
                path = %path.display(),
                "series table written"
            );
        }
        self.tables.insert(slug.to_owned(), merged);

        Ok(added)
    }

    fn load_existing(&self, slug: &str) -> Result<ResultTable> {
        let Some(path) = self.csv_path(slug) else {
            return Ok(ResultTable::new());
        };
        if !path.exists() {
            return Ok(ResultTable::new());
        }
        let table = ResultTable::read_csv(&path)?;
        tracing::debug!(
            slug,
            rows = table.len(),
            path = %path.display(),
            "loaded existing series table"
        );
        Ok(table)
    }
}

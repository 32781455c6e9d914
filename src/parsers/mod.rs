//! Parsers for cost exports, FX tables and pre-computed summaries

mod cost_csv;
mod fx_table;
mod summary;

pub use cost_csv::CostCsvParser;
pub use fx_table::FxTable;
pub use summary::{load_summary, parse_summary};

use crate::types::{RawCostRecord, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Trait for parsing cost rows out of export files
pub trait CostParser: Send + Sync {
    /// Parser name (e.g., "cost-csv")
    fn name(&self) -> &str;

    /// Directory to scan for export files
    fn data_dir(&self) -> &Path;

    /// Glob pattern for export files (e.g., "*.csv")
    fn file_pattern(&self) -> &str;

    /// Parse a single file into records
    fn parse_file(&self, path: &Path) -> Result<Vec<RawCostRecord>>;

    /// Parse every matching file in `data_dir`
    fn parse_all(&self) -> Result<Vec<RawCostRecord>> {
        let files = self.collect_files();
        self.parse_files(&files)
    }

    /// Collect all files matching the glob pattern, sorted by path
    fn collect_files(&self) -> Vec<PathBuf> {
        let pattern = self.data_dir().join(self.file_pattern());
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(|e| e.ok()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Parse files in parallel; output keeps file order. Unreadable files
    /// are logged and skipped.
    fn parse_files(&self, files: &[PathBuf]) -> Result<Vec<RawCostRecord>> {
        let per_file: Vec<Vec<RawCostRecord>> = files
            .par_iter()
            .map(|f| match self.parse_file(f) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(parser = self.name(), file = %f.display(), error = %e, "failed to parse file");
                    Vec::new()
                }
            })
            .collect();

        Ok(per_file.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn fixture_parser(dir: &str) -> CostCsvParser {
        CostCsvParser::new(PathBuf::from(dir), &AnalysisConfig::default())
    }

    #[test]
    fn test_parse_all_empty_directory() {
        let parser = fixture_parser("tests/fixtures/nonexistent");
        let result = parser.parse_all().unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_collect_files_sorted() {
        let parser = fixture_parser("tests/fixtures/multi");
        let files = parser.collect_files();
        assert_eq!(files.len(), 2);
        assert!(files[0] < files[1]);
    }

    #[test]
    fn test_parse_all_multiple_files_keeps_file_order() {
        let parser = fixture_parser("tests/fixtures/multi");
        let result = parser.parse_all().unwrap();
        // a-prior.csv (2 rows) then b-current.csv (1 row)
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].season, "전년");
        assert_eq!(result[2].season, "당년");
    }

    #[test]
    fn test_parse_files_skips_missing_file() {
        let parser = fixture_parser("tests/fixtures/multi");
        let files = vec![
            PathBuf::from("tests/fixtures/multi/does-not-exist.csv"),
            PathBuf::from("tests/fixtures/multi/b-current.csv"),
        ];
        let result = parser.parse_files(&files).unwrap();
        assert_eq!(result.len(), 1);
    }
}

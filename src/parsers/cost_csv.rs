//! Cost export CSV parser
//!
//! Column layout (0-based):
//! - 0..=13: brand, season, style, category, item name, PO, tag price,
//!   quantity, tag total, tag USD amount, estimate no, currency,
//!   manufacturer, submit date
//! - 14..=21: USD unit costs (material, artwork, submaterial, tag/label,
//!   labor, HQ supply, margin, expense)
//! - 22..=29: KRW unit costs, same order

use crate::config::AnalysisConfig;
use crate::services::normalizer::fold_category;
use crate::types::{RawCostRecord, Result, SeasoncostError, UnitCosts};
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};

use super::CostParser;

const USD_START: usize = 14;
const KRW_START: usize = 22;

/// Parser for cost export CSV files
pub struct CostCsvParser {
    data_dir: PathBuf,
    min_columns: usize,
    fold_accessories: bool,
}

impl CostCsvParser {
    pub fn new(data_dir: PathBuf, config: &AnalysisConfig) -> Self {
        Self {
            data_dir,
            min_columns: config.min_columns,
            fold_accessories: config.fold_accessories,
        }
    }

    /// Parse CSV text. The first row is a header; rows shorter than the
    /// minimum column count are dropped.
    pub fn parse_str(&self, text: &str, fold_accessories: bool) -> Result<Vec<RawCostRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        let mut short_rows = 0usize;

        for (row_idx, result) in reader.records().enumerate() {
            let row = match result {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(row = row_idx + 2, error = %e, "skipping unreadable row");
                    continue;
                }
            };

            if row.len() < self.min_columns {
                short_rows += 1;
                continue;
            }

            records.push(Self::parse_row(&row, fold_accessories));
        }

        if short_rows > 0 {
            tracing::debug!(
                rows = short_rows,
                min_columns = self.min_columns,
                "dropped rows below minimum column count"
            );
        }

        Ok(records)
    }

    fn parse_row(row: &StringRecord, fold_accessories: bool) -> RawCostRecord {
        let raw_category = text(row, 3);
        let category = if fold_accessories {
            fold_category(&raw_category)
        } else {
            raw_category
        };

        RawCostRecord {
            brand: text(row, 0),
            season: text(row, 1),
            style: text(row, 2),
            category,
            item_name: text(row, 4),
            po: text(row, 5),
            tag_price_krw: number(row, 6),
            quantity: quantity(row, 7),
            tag_total: number(row, 8),
            tag_usd_amount: number(row, 9),
            estimate_no: text(row, 10),
            currency: text(row, 11),
            manufacturer: text(row, 12),
            submit_date: text(row, 13),
            usd: unit_costs(row, USD_START),
            krw: unit_costs(row, KRW_START),
        }
    }
}

/// Files named like "... non ..." hold the off-season line, whose
/// accessory categories stay split.
fn is_non_season_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase().contains("non"))
        .unwrap_or(false)
}

fn text(row: &StringRecord, index: usize) -> String {
    row.get(index).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Unparseable or non-finite values read as 0
fn number(row: &StringRecord, index: usize) -> f64 {
    row.get(index)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Quantity with thousands separators ("1,200"); negatives read as 0
fn quantity(row: &StringRecord, index: usize) -> u64 {
    row.get(index)
        .and_then(|s| s.trim().replace(',', "").parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round() as u64)
        .unwrap_or(0)
}

fn unit_costs(row: &StringRecord, start: usize) -> UnitCosts {
    UnitCosts {
        material: number(row, start),
        artwork: number(row, start + 1),
        submaterial: number(row, start + 2),
        tag_label: number(row, start + 3),
        labor: number(row, start + 4),
        hq_supply: number(row, start + 5),
        margin: number(row, start + 6),
        expense: number(row, start + 7),
    }
}

impl CostParser for CostCsvParser {
    fn name(&self) -> &str {
        "cost-csv"
    }

    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_pattern(&self) -> &str {
        "*.csv"
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<RawCostRecord>> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| {
            SeasoncostError::Parse(format!("{} is not valid UTF-8: {}", path.display(), e))
        })?;
        // Excel exports often start with a BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        let fold = self.fold_accessories && !is_non_season_file(path);
        let records = self.parse_str(content, fold)?;
        tracing::debug!(file = %path.display(), records = records.len(), "parsed cost file");
        Ok(records)
    }
}

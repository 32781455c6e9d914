//! FX rate table parser
//!
//! Rows carry brand at column 1, season code at column 2, FX category
//! (의류 / 슈즈 / 용품) at column 5 and KRW-per-USD at column 6.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use crate::config::FxRates;
use crate::services::normalizer::{brand_code, fx_category, normalize_season_code, FX_CATEGORIES};
use crate::types::Result;

const MIN_FX_COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq)]
struct FxRow {
    brand: String,
    season: String,
    category: String,
    rate: f64,
}

/// Loaded FX table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FxTable {
    rows: Vec<FxRow>,
}

impl FxTable {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let table = Self::from_csv(reader)?;
        tracing::debug!(file = %path.display(), rows = table.len(), "loaded fx table");
        Ok(table)
    }

    pub fn parse_str(text: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        Self::from_csv(reader)
    }

    /// Short rows are skipped; undecodable rows fail the whole table.
    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.len() < MIN_FX_COLUMNS {
                continue;
            }
            let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
            rows.push(FxRow {
                brand: field(1),
                season: field(2),
                category: field(5),
                rate: field(6).parse::<f64>().unwrap_or(0.0),
            });
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn find(&self, brand: &str, season: &str, fx_category: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| {
                r.brand == brand && r.season == season && r.category == fx_category && r.rate > 0.0
            })
            .map(|r| r.rate)
    }

    /// Rate for a brand code, short season code ("26S") and FX category.
    /// A miss falls back to the apparel rate for the same brand and season.
    fn find_with_fallback(&self, brand: &str, season: &str, fx_cat: &str) -> Option<f64> {
        let apparel = FX_CATEGORIES[0];
        self.find(brand, season, fx_cat).or_else(|| {
            if fx_cat != apparel {
                self.find(brand, season, apparel)
            } else {
                None
            }
        })
    }

    /// Rate for a brand code, short season code ("26S") and product
    /// category; `None` category means apparel.
    pub fn lookup(&self, brand: &str, season: &str, category: Option<&str>) -> Option<f64> {
        let fx_cat = category.map(fx_category).unwrap_or(FX_CATEGORIES[0]);
        self.find_with_fallback(brand, season, fx_cat)
    }

    /// Prior/current apparel rates for a dashboard id and its two seasons
    /// ("26SS-M", "25SS", "26SS"). Misses use `fallback` with a warning.
    pub fn rates_for(
        &self,
        brand_id: &str,
        prior_season: &str,
        current_season: &str,
        fallback: f64,
    ) -> FxRates {
        let brand = brand_code(brand_id);
        let resolve = |season: &str| {
            let code = normalize_season_code(season);
            self.lookup(&brand, &code, None).unwrap_or_else(|| {
                tracing::warn!(
                    brand = %brand,
                    season = %code,
                    fallback,
                    "no fx rate found, using fallback"
                );
                fallback
            })
        };

        let rates = FxRates {
            prior: resolve(prior_season),
            current: resolve(current_season),
        };
        tracing::info!(brand = %brand, prior = rates.prior, current = rates.current, "resolved fx rates");
        rates
    }

    /// Rate per FX category for one season, after the apparel fallback.
    /// Categories with no rate at all are left out.
    pub fn category_rates(&self, brand_id: &str, season: &str) -> BTreeMap<String, f64> {
        let brand = brand_code(brand_id);
        let code = normalize_season_code(season);
        FX_CATEGORIES
            .iter()
            .filter_map(|cat| {
                self.find_with_fallback(&brand, &code, cat)
                    .map(|rate| (cat.to_string(), rate))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeasoncostError;

    const TABLE: &str = "\
id,브랜드,시즌,구분,통화,카테고리,환율
1,M,25S,,USD,의류,1380.5
2,M,26S,,USD,의류,1450
3,M,26S,,USD,슈즈,1440
4,I,26S,,USD,의류,0
5,I,26S,,USD,용품,1420
short,row
";

    fn table() -> FxTable {
        FxTable::parse_str(TABLE).unwrap()
    }

    #[test]
    fn test_parse_skips_short_rows() {
        let t = table();
        assert_eq!(t.len(), 5);
        assert_eq!(t.rows[0].brand, "M");
        assert_eq!(t.rows[0].category, "의류");
    }

    #[test]
    fn test_lookup_exact_category() {
        let t = table();
        assert_eq!(t.lookup("M", "26S", Some("Shoes")), Some(1440.0));
        assert_eq!(t.lookup("M", "26S", Some("Outer")), Some(1450.0));
        assert_eq!(t.lookup("M", "26S", None), Some(1450.0));
    }

    #[test]
    fn test_lookup_falls_back_to_apparel() {
        let t = table();
        // no 용품 row for M/26S
        assert_eq!(t.lookup("M", "26S", Some("Bag")), Some(1450.0));
    }

    #[test]
    fn test_lookup_ignores_zero_rate() {
        let t = table();
        assert_eq!(t.lookup("I", "26S", None), None);
        assert_eq!(t.lookup("I", "26S", Some("Acc_etc")), Some(1420.0));
    }

    #[test]
    fn test_rates_for_dashboard_id() {
        let rates = table().rates_for("26SS-M", "25SS", "26SS", 1300.0);
        assert!((rates.prior - 1380.5).abs() < f64::EPSILON);
        assert!((rates.current - 1450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rates_for_missing_uses_fallback() {
        let rates = table().rates_for("ST", "25SS", "26SS", 1300.0);
        assert!((rates.prior - 1300.0).abs() < f64::EPSILON);
        assert!((rates.current - 1300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_rates_per_fx_category() {
        let rates = table().category_rates("26SS-M", "26SS");
        assert_eq!(rates.get("의류"), Some(&1450.0));
        assert_eq!(rates.get("슈즈"), Some(&1440.0));
        // no 용품 row: apparel rate
        assert_eq!(rates.get("용품"), Some(&1450.0));
    }

    #[test]
    fn test_category_rates_without_apparel_row() {
        let rates = table().category_rates("KIDS-I", "26S");
        assert_eq!(rates.len(), 1);
        assert_eq!(rates.get("용품"), Some(&1420.0));
        assert!(table().category_rates("ST", "26S").is_empty());
    }

    #[test]
    fn test_load_fixture_table() {
        let t = FxTable::load(Path::new("tests/fixtures/fx.csv")).unwrap();
        assert!(!t.is_empty());
        assert_eq!(t.lookup("M", "25S", Some("Acc_etc")), Some(1000.0));
    }

    #[test]
    fn test_load_missing_file_is_csv_error() {
        let result = FxTable::load(Path::new("tests/fixtures/missing-fx.csv"));
        assert!(matches!(result, Err(SeasoncostError::Csv(_))));
    }

    #[test]
    fn test_load_invalid_utf8_is_csv_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fx.csv");
        let mut bytes = "번호,브랜드,시즌,구분,통화,카테고리,환율\n1,M,25S,FOB,USD,".as_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b",1380\n");
        std::fs::write(&path, bytes).unwrap();

        let result = FxTable::load(&path);
        assert!(matches!(result, Err(SeasoncostError::Csv(_))));
    }
}

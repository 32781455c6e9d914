//! Analysis configuration
//!
//! Lookup tables and constants the parser and aggregator need. Passed
//! explicitly so several analyses (brands, seasons) can run side by side
//! without sharing state.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::services::normalizer::{fx_category, season_matches};
use crate::types::{Period, Result, SeasoncostError};

/// Prior-period season marker used in the raw CSV
pub const PRIOR_MARKER: &str = "전년";
/// Current-period season marker used in the raw CSV
pub const CURRENT_MARKER: &str = "당년";

/// Tag price is divided by this before computing cost rate.
/// Assumed 10% VAT-like factor; not confirmed by the data owners.
pub const DEFAULT_TAX_FACTOR: f64 = 1.1;

/// Minimum columns for a data row (through the last KRW unit cost)
pub const DEFAULT_MIN_COLUMNS: usize = 30;

/// KRW per USD used when an FX table has no matching row
pub const FALLBACK_FX_RATE: f64 = 1300.0;

/// Display metadata for a product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub order: usize,
}

impl CategoryInfo {
    fn new(id: &str, name: &str, order: usize) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            order,
        }
    }
}

/// KRW per USD for each period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FxRates {
    pub prior: f64,
    pub current: f64,
}

impl Default for FxRates {
    fn default() -> Self {
        Self {
            prior: 1296.77,
            current: 1415.00,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub prior_marker: String,
    pub current_marker: String,
    /// Prior season code, e.g. "25SS"; rows tagged with it count as prior
    pub prior_season: Option<String>,
    /// Current season code, e.g. "26SS"
    pub current_season: Option<String>,
    pub fx: FxRates,
    /// Prior-period KRW per USD keyed by FX category (의류 / 슈즈 / 용품).
    /// Categories without an entry convert at `fx.prior`.
    pub category_fx: BTreeMap<String, f64>,
    pub fallback_fx_rate: f64,
    pub tax_factor: f64,
    pub min_columns: usize,
    /// Display order; unknown categories sort after these
    pub categories: Vec<CategoryInfo>,
    /// Fold SHOES/BAG/HEADWEAR/ACC into Acc_etc while parsing
    pub fold_accessories: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            prior_marker: PRIOR_MARKER.to_string(),
            current_marker: CURRENT_MARKER.to_string(),
            prior_season: None,
            current_season: None,
            fx: FxRates::default(),
            category_fx: BTreeMap::new(),
            fallback_fx_rate: FALLBACK_FX_RATE,
            tax_factor: DEFAULT_TAX_FACTOR,
            min_columns: DEFAULT_MIN_COLUMNS,
            categories: vec![
                CategoryInfo::new("Outer", "OUTER", 1),
                CategoryInfo::new("Inner", "INNER", 2),
                CategoryInfo::new("Bottom", "BOTTOM", 3),
                CategoryInfo::new("Shoes", "SHOES", 4),
                CategoryInfo::new("Bag", "BAG", 5),
                CategoryInfo::new("Acc_etc", "ACC", 6),
                CategoryInfo::new("Wear_etc", "WEAR", 7),
            ],
            fold_accessories: true,
        }
    }
}

impl AnalysisConfig {
    /// Load config from `path`, or from `~/.seasoncost/config.json` when
    /// no path is given and that file exists. Falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            SeasoncostError::Config(format!("invalid config {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loaded analysis config");
        Ok(config)
    }

    /// Get the default config path (~/.seasoncost/config.json)
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.home_dir().join(".seasoncost").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tax_factor > 0.0) {
            return Err(SeasoncostError::Config(format!(
                "tax_factor must be positive, got {}",
                self.tax_factor
            )));
        }
        if !(self.fx.prior > 0.0) || !(self.fx.current > 0.0) {
            return Err(SeasoncostError::Config(format!(
                "fx rates must be positive, got prior={} current={}",
                self.fx.prior, self.fx.current
            )));
        }
        if let Some((category, rate)) = self.category_fx.iter().find(|(_, r)| !(**r > 0.0)) {
            return Err(SeasoncostError::Config(format!(
                "fx rate for {} must be positive, got {}",
                category, rate
            )));
        }
        Ok(())
    }

    /// Prior-period rate used to convert a product category's KRW tag
    pub fn prior_fx_for(&self, category: &str) -> f64 {
        self.category_fx
            .get(fx_category(category))
            .copied()
            .unwrap_or(self.fx.prior)
    }

    /// Display order for a category; unknown categories get `usize::MAX`
    pub fn category_order(&self, category: &str) -> usize {
        self.categories
            .iter()
            .find(|c| c.id == category)
            .map(|c| c.order)
            .unwrap_or(usize::MAX)
    }

    /// Resolve a raw season marker to a period, `None` if it is neither
    pub fn classify(&self, season: &str) -> Option<Period> {
        if season == self.prior_marker
            || self
                .prior_season
                .as_deref()
                .is_some_and(|code| season_matches(season, code))
        {
            Some(Period::Prior)
        } else if season == self.current_marker
            || self
                .current_season
                .as_deref()
                .is_some_and(|code| season_matches(season, code))
        {
            Some(Period::Current)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_category_order() {
        let config = AnalysisConfig::default();
        assert_eq!(config.categories.len(), 7);
        assert_eq!(config.category_order("Outer"), 1);
        assert_eq!(config.category_order("Wear_etc"), 7);
        assert_eq!(config.category_order("Unknown"), usize::MAX);
    }

    #[test]
    fn test_classify_markers() {
        let config = AnalysisConfig::default();
        assert_eq!(config.classify("전년"), Some(Period::Prior));
        assert_eq!(config.classify("당년"), Some(Period::Current));
        assert_eq!(config.classify("NON"), None);
        assert_eq!(config.classify(""), None);
    }

    #[test]
    fn test_classify_season_codes_with_aliases() {
        let config = AnalysisConfig {
            prior_season: Some("25SS".into()),
            current_season: Some("26SS".into()),
            ..Default::default()
        };
        assert_eq!(config.classify("25SS"), Some(Period::Prior));
        assert_eq!(config.classify("25S"), Some(Period::Prior));
        assert_eq!(config.classify("26S"), Some(Period::Current));
        assert_eq!(config.classify("24S"), None);
        // markers still work alongside codes
        assert_eq!(config.classify("전년"), Some(Period::Prior));
    }

    #[test]
    fn test_validate_rejects_non_positive_tax_factor() {
        let config = AnalysisConfig {
            tax_factor: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SeasoncostError::Config(_))
        ));
    }

    #[test]
    fn test_prior_fx_for_category() {
        let mut config = AnalysisConfig::default();
        assert!((config.prior_fx_for("Acc_etc") - 1296.77).abs() < f64::EPSILON);

        config.category_fx.insert("용품".into(), 1000.0);
        config.category_fx.insert("의류".into(), 1380.0);
        assert!((config.prior_fx_for("Acc_etc") - 1000.0).abs() < f64::EPSILON);
        assert!((config.prior_fx_for("Outer") - 1380.0).abs() < f64::EPSILON);
        // no 슈즈 entry
        assert!((config.prior_fx_for("Shoes") - 1296.77).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_non_positive_category_fx() {
        let mut config = AnalysisConfig::default();
        config.category_fx.insert("슈즈".into(), 0.0);
        assert!(matches!(
            config.validate(),
            Err(SeasoncostError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file_partial_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{ "tax_factor": 1.0, "fx": { "prior": 1300.0, "current": 1400.0 } }"#,
        )
        .unwrap();

        let config = AnalysisConfig::load(Some(&path)).unwrap();
        assert!((config.tax_factor - 1.0).abs() < f64::EPSILON);
        assert!((config.fx.current - 1400.0).abs() < f64::EPSILON);
        // untouched fields keep defaults
        assert_eq!(config.prior_marker, PRIOR_MARKER);
        assert_eq!(config.min_columns, DEFAULT_MIN_COLUMNS);
    }

    #[test]
    fn test_load_invalid_json_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = AnalysisConfig::load(Some(&path));
        assert!(matches!(result, Err(SeasoncostError::Config(_))));
    }

    #[test]
    fn test_load_missing_explicit_path_is_io_error() {
        let result = AnalysisConfig::load(Some(Path::new("/nonexistent/seasoncost.json")));
        assert!(matches!(result, Err(SeasoncostError::Io(_))));
    }
}

//! Data loading service for the CLI
//!
//! Wires export files through the parser, aggregator and metrics layers
//! into one `Analysis`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::parsers::{load_summary, CostCsvParser, CostParser, FxTable};
use crate::services::metrics::DerivedMetrics;
use crate::services::normalizer::{previous_season, season_from_brand_id};
use crate::services::Aggregator;
use crate::types::{AggregatedItem, CategoryTotal, RawCostRecord, Result, SummaryData, Total};

/// Files an analysis reads from
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    /// A cost CSV file, or a directory of them
    pub input: PathBuf,
    /// Pre-computed summary JSON
    pub summary: Option<PathBuf>,
    /// FX table CSV; needs `brand` and both season codes
    pub fx_table: Option<PathBuf>,
    /// Dashboard id used for FX lookup, e.g. "26SS-M". A season prefix
    /// supplies season codes the config leaves unset.
    pub brand: Option<String>,
}

/// Everything the presentation layer consumes
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub record_count: usize,
    pub items: Vec<AggregatedItem>,
    /// Summary entries where present, otherwise derived from items
    pub categories: Vec<CategoryTotal>,
    pub total: Option<Total>,
    pub metrics: Option<DerivedMetrics>,
}

/// Loads export files and runs the aggregation pipeline
pub struct DataLoaderService {
    config: AnalysisConfig,
}

impl DataLoaderService {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Read the requested files and analyze them.
    ///
    /// Season codes derived from the dashboard id and FX rates resolved
    /// from an FX table apply to this load only.
    pub fn load(&self, request: &LoadRequest) -> Result<Analysis> {
        let mut config = self.config.clone();
        if let Some(brand) = request.brand.as_deref() {
            Self::resolve_seasons(&mut config, brand);
        }
        if let Some(path) = &request.fx_table {
            Self::apply_fx_table(&mut config, path, request.brand.as_deref())?;
        }

        let records = Self::read_records(&request.input, &config)?;
        let summary = request
            .summary
            .as_deref()
            .map(load_summary)
            .transpose()?;

        Ok(Self::analyze(&records, summary.as_ref(), &config))
    }

    /// Pure pipeline over in-memory records
    pub fn analyze(
        records: &[RawCostRecord],
        summary: Option<&SummaryData>,
        config: &AnalysisConfig,
    ) -> Analysis {
        let items = Aggregator::by_item(records, config);
        let categories = Aggregator::category_totals(&items, summary, config);
        let total = Aggregator::total(&items, summary, config);
        let metrics = total
            .as_ref()
            .map(|t| DerivedMetrics::from_total(t.stats(), config.fx));

        if let Some(t) = &total {
            tracing::info!(
                source = t.source(),
                items = items.len(),
                categories = categories.len(),
                "analysis complete"
            );
        }

        Analysis {
            record_count: records.len(),
            items,
            categories,
            total,
            metrics,
        }
    }

    fn read_records(input: &Path, config: &AnalysisConfig) -> Result<Vec<RawCostRecord>> {
        if input.is_dir() {
            CostCsvParser::new(input.to_path_buf(), config).parse_all()
        } else {
            let dir = input.parent().unwrap_or(Path::new(".")).to_path_buf();
            CostCsvParser::new(dir, config).parse_file(input)
        }
    }

    /// Fill unset season codes from a "26SS-M" style id; the prior season
    /// is the same season one year earlier.
    fn resolve_seasons(config: &mut AnalysisConfig, brand: &str) {
        if config.current_season.is_none() {
            config.current_season = season_from_brand_id(brand);
        }
        if config.prior_season.is_none() {
            config.prior_season = config.current_season.as_deref().and_then(previous_season);
        }
        tracing::debug!(
            brand,
            prior = ?config.prior_season,
            current = ?config.current_season,
            "resolved season codes"
        );
    }

    fn apply_fx_table(config: &mut AnalysisConfig, path: &Path, brand: Option<&str>) -> Result<()> {
        let (Some(brand), Some(prior), Some(current)) = (
            brand,
            config.prior_season.clone(),
            config.current_season.clone(),
        ) else {
            tracing::warn!("fx table given without brand and both season codes; using configured rates");
            return Ok(());
        };

        let table = FxTable::load(path)?;
        if table.is_empty() {
            tracing::warn!(file = %path.display(), "fx table has no rate rows");
        }
        config.fx = table.rates_for(brand, &prior, &current, config.fallback_fx_rate);
        config.category_fx = table.category_rates(brand, &prior);
        Ok(())
    }
}

//! Aggregator service for quantity-weighted cost rollups
//!
//! One averaging routine serves every level: raw order rows roll up into
//! items, and items roll up into categories and the grand total through
//! the same code, so the levels cannot drift apart numerically.

use std::collections::HashMap;

use crate::config::AnalysisConfig;
use crate::services::metrics::{cost_rate, yoy};
use crate::types::{
    AggregatedItem, CategorySubtotal, CategoryTotal, CostBreakdown, Period, PeriodComparison,
    PeriodStats, RawCostRecord, SummaryData, Total, TotalStats,
};

/// One observation as seen by the averaging routine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedSample {
    pub quantity: u64,
    /// Tag price in the comparison currency (USD at prior FX)
    pub tag: f64,
    pub tag_krw: f64,
    pub cost: CostBreakdown,
    pub cost_krw: CostBreakdown,
}

impl WeightedSample {
    /// Sample for a raw order row. Both periods convert the KRW tag at the
    /// prior-period rate for the row's FX category, so tag comparisons
    /// stay FX-neutral.
    pub fn from_record(record: &RawCostRecord, prior_fx: f64) -> Self {
        let tag = if prior_fx > 0.0 {
            record.tag_price_krw / prior_fx
        } else {
            0.0
        };
        Self {
            quantity: record.quantity,
            tag,
            tag_krw: record.tag_price_krw,
            cost: record.usd.breakdown(),
            cost_krw: record.krw.breakdown(),
        }
    }

    /// Sample for an already-aggregated period, weighted by its quantity
    pub fn from_stats(stats: &PeriodStats) -> Self {
        Self {
            quantity: stats.quantity,
            tag: stats.avg_tag,
            tag_krw: stats.avg_tag_krw,
            cost: stats.cost,
            cost_krw: stats.cost_krw,
        }
    }
}

/// Running Σ(value × quantity) for one period bucket
#[derive(Debug, Default)]
struct PeriodAccumulator {
    quantity: u64,
    tag: f64,
    tag_krw: f64,
    cost: CostBreakdown,
    cost_krw: CostBreakdown,
}

impl PeriodAccumulator {
    fn push(&mut self, sample: &WeightedSample) {
        let q = sample.quantity as f64;
        self.quantity = self.quantity.saturating_add(sample.quantity);
        self.tag += sample.tag * q;
        self.tag_krw += sample.tag_krw * q;
        self.cost.add(&sample.cost.scaled(q));
        self.cost_krw.add(&sample.cost_krw.scaled(q));
    }

    fn finish(&self, tax_factor: f64) -> PeriodStats {
        if self.quantity == 0 {
            return PeriodStats::default();
        }
        let inv = 1.0 / self.quantity as f64;
        let avg_tag = self.tag * inv;
        let avg_tag_krw = self.tag_krw * inv;
        let cost = self.cost.scaled(inv);
        let cost_krw = self.cost_krw.scaled(inv);

        PeriodStats {
            quantity: self.quantity,
            avg_tag,
            avg_tag_krw,
            cost,
            cost_krw,
            cost_rate: cost_rate(cost.total(), avg_tag, tax_factor),
            cost_rate_krw: cost_rate(cost_krw.total(), avg_tag_krw, tax_factor),
        }
    }
}

/// Quantity-weighted average of `samples`: Σ(v × q) / Σq for every field,
/// all zero when Σq is 0.
pub fn weighted_period<T, F>(
    samples: impl IntoIterator<Item = T>,
    accessor: F,
    tax_factor: f64,
) -> PeriodStats
where
    F: Fn(T) -> WeightedSample,
{
    let mut acc = PeriodAccumulator::default();
    for sample in samples {
        acc.push(&accessor(sample));
    }
    acc.finish(tax_factor)
}

/// Rows of one (category, item) key, split by period
#[derive(Default)]
struct ItemGroup<'a> {
    prior: Vec<&'a RawCostRecord>,
    current: Vec<&'a RawCostRecord>,
}

/// Aggregator for cost rollups
pub struct Aggregator;

impl Aggregator {
    /// Group raw rows by (category, item) and roll up each period.
    ///
    /// Rows whose season resolves to neither period are excluded from both
    /// buckets; their key still yields an (all-zero) item. Items sort by
    /// category display order, then by name ignoring case.
    pub fn by_item(records: &[RawCostRecord], config: &AnalysisConfig) -> Vec<AggregatedItem> {
        let mut groups: HashMap<(String, String), ItemGroup> = HashMap::new();
        let mut unclassified = 0usize;

        for record in records {
            let key = (
                record.category.trim().to_string(),
                record.item_name.trim().to_string(),
            );
            let group = groups.entry(key).or_default();
            match config.classify(&record.season) {
                Some(Period::Prior) => group.prior.push(record),
                Some(Period::Current) => group.current.push(record),
                None => unclassified += 1,
            }
        }

        if unclassified > 0 {
            tracing::warn!(
                rows = unclassified,
                prior = %config.prior_marker,
                current = %config.current_marker,
                "rows with unrecognized season excluded from both periods"
            );
        }

        let tax = config.tax_factor;
        let mut items: Vec<AggregatedItem> = groups
            .into_iter()
            .map(|((category, item_name), group)| {
                let prior_fx = config.prior_fx_for(&category);
                let prior = weighted_period(
                    group.prior,
                    |r| WeightedSample::from_record(r, prior_fx),
                    tax,
                );
                let current = weighted_period(
                    group.current,
                    |r| WeightedSample::from_record(r, prior_fx),
                    tax,
                );
                AggregatedItem {
                    category,
                    item_name,
                    comparison: PeriodComparison::new(prior, current),
                }
            })
            .collect();

        items.sort_by_cached_key(|item| {
            (
                config.category_order(&item.category),
                item.category.clone(),
                item.item_name.to_lowercase(),
                item.item_name.clone(),
            )
        });

        tracing::debug!(
            records = records.len(),
            items = items.len(),
            "aggregated records by item"
        );
        items
    }

    /// Roll already-aggregated items up one level
    pub fn rollup<'a>(
        items: impl IntoIterator<Item = &'a AggregatedItem> + Clone,
        tax_factor: f64,
    ) -> PeriodComparison {
        let prior = weighted_period(
            items.clone(),
            |item| WeightedSample::from_stats(&item.comparison.prior),
            tax_factor,
        );
        let current = weighted_period(
            items,
            |item| WeightedSample::from_stats(&item.comparison.current),
            tax_factor,
        );
        PeriodComparison::new(prior, current)
    }

    /// Subtotal for one category, `None` when it has no items
    pub fn category(
        category: &str,
        items: &[AggregatedItem],
        config: &AnalysisConfig,
    ) -> Option<CategorySubtotal> {
        let members: Vec<&AggregatedItem> =
            items.iter().filter(|i| i.category == category).collect();
        if members.is_empty() {
            return None;
        }
        Some(CategorySubtotal {
            category: category.to_string(),
            item_count: members.len(),
            comparison: Self::rollup(members.iter().copied(), config.tax_factor),
        })
    }

    /// Subtotals for every category present, in display order
    pub fn by_category(items: &[AggregatedItem], config: &AnalysisConfig) -> Vec<CategorySubtotal> {
        category_names(items, None, config)
            .into_iter()
            .filter_map(|c| Self::category(c, items, config))
            .collect()
    }

    /// Per-category totals in display order, each resolved through
    /// [`Aggregator::category_stats`]. Categories that only appear in the
    /// summary are included with an item count of 0.
    pub fn category_totals(
        items: &[AggregatedItem],
        summary: Option<&SummaryData>,
        config: &AnalysisConfig,
    ) -> Vec<CategoryTotal> {
        category_names(items, summary, config)
            .into_iter()
            .filter_map(|category| {
                let total = Self::category_stats(category, items, summary, config)?;
                Some(CategoryTotal {
                    category: category.to_string(),
                    item_count: items.iter().filter(|i| i.category == category).count(),
                    total,
                })
            })
            .collect()
    }

    /// Grand total. A summary total is used verbatim when present;
    /// otherwise all items are rolled up. `None` when neither exists.
    pub fn total(
        items: &[AggregatedItem],
        summary: Option<&SummaryData>,
        config: &AnalysisConfig,
    ) -> Option<Total> {
        if let Some(stats) = summary.and_then(|s| s.total) {
            return Some(Total::Precomputed(stats));
        }
        if items.is_empty() {
            return None;
        }
        let comparison = Self::rollup(items, config.tax_factor);
        Some(Total::Derived(total_stats(&comparison, config.tax_factor)))
    }

    /// Per-category total with the same precedence as [`Aggregator::total`]
    pub fn category_stats(
        category: &str,
        items: &[AggregatedItem],
        summary: Option<&SummaryData>,
        config: &AnalysisConfig,
    ) -> Option<Total> {
        if let Some(stats) = summary.and_then(|s| s.category(category)) {
            return Some(Total::Precomputed(*stats));
        }
        Self::category(category, items, config)
            .map(|sub| Total::Derived(total_stats(&sub.comparison, config.tax_factor)))
    }
}

/// Distinct category names from items and summary, in display order
fn category_names<'a>(
    items: &'a [AggregatedItem],
    summary: Option<&'a SummaryData>,
    config: &AnalysisConfig,
) -> Vec<&'a str> {
    let from_summary = summary
        .map(|s| s.categories.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|c| c.category.as_str());

    let mut names: Vec<&str> = Vec::new();
    for name in items.iter().map(|i| i.category.as_str()).chain(from_summary) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names.sort_by(|a, b| {
        config
            .category_order(a)
            .cmp(&config.category_order(b))
            .then_with(|| a.cmp(b))
    });
    names
}

/// Express a rolled-up comparison in the summary's dual-currency shape
pub fn total_stats(cmp: &PeriodComparison, tax_factor: f64) -> TotalStats {
    let (p, c) = (&cmp.prior, &cmp.current);
    let rate = |component: f64, stats: &PeriodStats| cost_rate(component, stats.avg_tag, tax_factor);

    TotalStats {
        qty_prior: p.quantity as f64,
        qty_current: c.quantity as f64,
        qty_yoy: cmp.quantity_yoy,

        cost_rate_prior_usd: p.cost_rate,
        cost_rate_current_usd: c.cost_rate,
        cost_rate_delta_usd: cmp.cost_rate_delta,
        avg_tag_prior_usd: p.avg_tag,
        avg_tag_current_usd: c.avg_tag,
        tag_yoy_usd: cmp.tag_yoy,
        avg_cost_prior_usd: p.avg_total_cost(),
        avg_cost_current_usd: c.avg_total_cost(),
        cost_yoy_usd: cmp.cost_yoy,

        material_prior_usd: p.cost.material,
        material_current_usd: c.cost.material,
        artwork_prior_usd: p.cost.artwork,
        artwork_current_usd: c.cost.artwork,
        labor_prior_usd: p.cost.labor,
        labor_current_usd: c.cost.labor,
        margin_prior_usd: p.cost.margin,
        margin_current_usd: c.cost.margin,
        expense_prior_usd: p.cost.expense,
        expense_current_usd: c.cost.expense,

        material_rate_prior_usd: rate(p.cost.material, p),
        material_rate_current_usd: rate(c.cost.material, c),
        artwork_rate_prior_usd: rate(p.cost.artwork, p),
        artwork_rate_current_usd: rate(c.cost.artwork, c),
        labor_rate_prior_usd: rate(p.cost.labor, p),
        labor_rate_current_usd: rate(c.cost.labor, c),
        margin_rate_prior_usd: rate(p.cost.margin, p),
        margin_rate_current_usd: rate(c.cost.margin, c),
        expense_rate_prior_usd: rate(p.cost.expense, p),
        expense_rate_current_usd: rate(c.cost.expense, c),

        cost_rate_prior_krw: p.cost_rate_krw,
        cost_rate_current_krw: c.cost_rate_krw,
        cost_rate_delta_krw: c.cost_rate_krw - p.cost_rate_krw,
        avg_tag_prior_krw: p.avg_tag_krw,
        avg_tag_current_krw: c.avg_tag_krw,
        tag_yoy_krw: yoy(p.avg_tag_krw, c.avg_tag_krw),
        avg_cost_prior_krw: p.avg_total_cost_krw(),
        avg_cost_current_krw: c.avg_total_cost_krw(),
        cost_yoy_krw: yoy(p.avg_total_cost_krw(), c.avg_total_cost_krw()),
    }
}

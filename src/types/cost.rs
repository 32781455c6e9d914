//! Cost record and aggregation result types

use serde::{Deserialize, Serialize};

use crate::services::metrics::{cost_rate_delta, yoy};

/// Comparison period a season marker resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Prior season ("전년")
    Prior,
    /// Current season ("당년")
    Current,
}

/// Per-piece unit costs in one currency, in CSV column order
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitCosts {
    pub material: f64,
    pub artwork: f64,
    pub submaterial: f64,
    pub tag_label: f64,
    pub labor: f64,
    pub hq_supply: f64,
    pub margin: f64,
    pub expense: f64,
}

impl UnitCosts {
    /// Material + submaterial + HQ supply + tag/label, summed per row
    pub fn material_composite(&self) -> f64 {
        self.material + self.submaterial + self.hq_supply + self.tag_label
    }

    /// Collapse the eight raw columns into the five reported components
    pub fn breakdown(&self) -> CostBreakdown {
        CostBreakdown {
            material: self.material_composite(),
            artwork: self.artwork,
            labor: self.labor,
            margin: self.margin,
            expense: self.expense,
        }
    }
}

/// One manufacturing-order cost line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCostRecord {
    pub brand: String,
    /// Raw season marker, e.g. "전년", "당년", "25S"
    pub season: String,
    pub style: String,
    pub category: String,
    pub item_name: String,
    pub po: String,
    pub tag_price_krw: f64,
    pub quantity: u64,
    pub tag_total: f64,
    pub tag_usd_amount: f64,
    pub estimate_no: String,
    pub currency: String,
    pub manufacturer: String,
    pub submit_date: String,
    pub usd: UnitCosts,
    pub krw: UnitCosts,
}

/// The five cost components reported per period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Composite of material, submaterial, HQ supply and tag/label
    pub material: f64,
    pub artwork: f64,
    pub labor: f64,
    pub margin: f64,
    pub expense: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.material + self.artwork + self.labor + self.margin + self.expense
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            material: self.material * factor,
            artwork: self.artwork * factor,
            labor: self.labor * factor,
            margin: self.margin * factor,
            expense: self.expense * factor,
        }
    }

    pub fn add(&mut self, other: &CostBreakdown) {
        self.material += other.material;
        self.artwork += other.artwork;
        self.labor += other.labor;
        self.margin += other.margin;
        self.expense += other.expense;
    }
}

/// Quantity-weighted averages for one period.
///
/// When `quantity` is 0 every other field is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub quantity: u64,
    /// Tag price converted at the prior-period FX rate
    pub avg_tag: f64,
    pub avg_tag_krw: f64,
    /// USD unit costs
    pub cost: CostBreakdown,
    /// KRW unit costs
    pub cost_krw: CostBreakdown,
    /// USD cost as % of the tax-adjusted tag price
    pub cost_rate: f64,
    pub cost_rate_krw: f64,
}

impl PeriodStats {
    pub fn avg_total_cost(&self) -> f64 {
        self.cost.total()
    }

    pub fn avg_total_cost_krw(&self) -> f64 {
        self.cost_krw.total()
    }
}

/// Prior vs current rollup with period-over-period deltas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub prior: PeriodStats,
    pub current: PeriodStats,
    /// current - prior
    pub quantity_delta: i64,
    pub quantity_yoy: f64,
    pub tag_yoy: f64,
    pub cost_yoy: f64,
    /// Percentage points, negative means the cost rate improved
    pub cost_rate_delta: f64,
}

impl PeriodComparison {
    pub fn new(prior: PeriodStats, current: PeriodStats) -> Self {
        let signed = |q: u64| i64::try_from(q).unwrap_or(i64::MAX);
        let quantity_delta = signed(current.quantity).saturating_sub(signed(prior.quantity));
        Self {
            quantity_delta,
            quantity_yoy: yoy(prior.quantity as f64, current.quantity as f64),
            tag_yoy: yoy(prior.avg_tag, current.avg_tag),
            cost_yoy: yoy(prior.avg_total_cost(), current.avg_total_cost()),
            cost_rate_delta: cost_rate_delta(prior.cost_rate, current.cost_rate),
            prior,
            current,
        }
    }
}

/// One (category, item) pair rolled up over both periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedItem {
    pub category: String,
    pub item_name: String,
    #[serde(flatten)]
    pub comparison: PeriodComparison,
}

/// Items of one category rolled up again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySubtotal {
    pub category: String,
    pub item_count: usize,
    #[serde(flatten)]
    pub comparison: PeriodComparison,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(quantity: u64, avg_tag: f64, cost: CostBreakdown, cost_rate: f64) -> PeriodStats {
        PeriodStats {
            quantity,
            avg_tag,
            cost,
            cost_rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_material_composite_sums_four_columns() {
        let costs = UnitCosts {
            material: 5.0,
            submaterial: 1.0,
            hq_supply: 0.5,
            tag_label: 0.25,
            artwork: 99.0,
            ..Default::default()
        };
        assert!((costs.material_composite() - 6.75).abs() < 1e-12);
        assert!((costs.breakdown().material - 6.75).abs() < 1e-12);
        assert!((costs.breakdown().artwork - 99.0).abs() < 1e-12);
    }

    #[test]
    fn test_breakdown_total() {
        let b = CostBreakdown {
            material: 6.0,
            artwork: 2.0,
            labor: 3.0,
            margin: 1.0,
            expense: 1.0,
        };
        assert!((b.total() - 13.0).abs() < 1e-12);
        assert!((b.scaled(2.0).total() - 26.0).abs() < 1e-12);
    }

    #[test]
    fn test_comparison_deltas() {
        let cost_prior = CostBreakdown {
            material: 10.0,
            ..Default::default()
        };
        let cost_current = CostBreakdown {
            material: 12.0,
            ..Default::default()
        };
        let cmp = PeriodComparison::new(
            stats(10, 100.0, cost_prior, 20.0),
            stats(4, 120.0, cost_current, 18.5),
        );

        assert_eq!(cmp.quantity_delta, -6);
        assert!((cmp.quantity_yoy - 40.0).abs() < 1e-9);
        assert!((cmp.tag_yoy - 120.0).abs() < 1e-9);
        assert!((cmp.cost_yoy - 120.0).abs() < 1e-9);
        assert!((cmp.cost_rate_delta - (-1.5)).abs() < 1e-12);
    }

    #[test]
    fn test_comparison_empty_prior_yields_zero_ratios() {
        let cmp = PeriodComparison::new(
            PeriodStats::default(),
            stats(5, 100.0, CostBreakdown::default(), 10.0),
        );
        assert_eq!(cmp.quantity_delta, 5);
        assert_eq!(cmp.tag_yoy, 0.0);
        assert_eq!(cmp.quantity_yoy, 0.0);
    }

    #[test]
    fn test_quantity_delta_saturates() {
        let huge = stats(u64::MAX, 0.0, CostBreakdown::default(), 0.0);
        let none = PeriodStats::default();

        assert_eq!(PeriodComparison::new(none, huge).quantity_delta, i64::MAX);
        assert_eq!(PeriodComparison::new(huge, none).quantity_delta, -i64::MAX);
        assert_eq!(PeriodComparison::new(huge, huge).quantity_delta, 0);
    }
}

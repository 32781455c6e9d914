//! Dual-currency totals in the pre-computed summary wire format
//!
//! Field names follow the summary JSON produced upstream:
//! `<metric><24F|25F>_<usd|krw>`, where `24F` is the prior period and
//! `25F` the current one. Absent fields read as 0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalStats {
    #[serde(rename = "qty24F")]
    pub qty_prior: f64,
    #[serde(rename = "qty25F")]
    pub qty_current: f64,
    #[serde(rename = "qtyYoY")]
    pub qty_yoy: f64,

    // USD basis
    #[serde(rename = "costRate24F_usd")]
    pub cost_rate_prior_usd: f64,
    #[serde(rename = "costRate25F_usd")]
    pub cost_rate_current_usd: f64,
    #[serde(rename = "costRateChange_usd")]
    pub cost_rate_delta_usd: f64,
    #[serde(rename = "avgTag24F_usd")]
    pub avg_tag_prior_usd: f64,
    #[serde(rename = "avgTag25F_usd")]
    pub avg_tag_current_usd: f64,
    #[serde(rename = "tagYoY_usd")]
    pub tag_yoy_usd: f64,
    #[serde(rename = "avgCost24F_usd")]
    pub avg_cost_prior_usd: f64,
    #[serde(rename = "avgCost25F_usd")]
    pub avg_cost_current_usd: f64,
    #[serde(rename = "costYoY_usd")]
    pub cost_yoy_usd: f64,

    #[serde(rename = "material24F_usd")]
    pub material_prior_usd: f64,
    #[serde(rename = "material25F_usd")]
    pub material_current_usd: f64,
    #[serde(rename = "artwork24F_usd")]
    pub artwork_prior_usd: f64,
    #[serde(rename = "artwork25F_usd")]
    pub artwork_current_usd: f64,
    #[serde(rename = "labor24F_usd")]
    pub labor_prior_usd: f64,
    #[serde(rename = "labor25F_usd")]
    pub labor_current_usd: f64,
    #[serde(rename = "margin24F_usd")]
    pub margin_prior_usd: f64,
    #[serde(rename = "margin25F_usd")]
    pub margin_current_usd: f64,
    #[serde(rename = "expense24F_usd")]
    pub expense_prior_usd: f64,
    #[serde(rename = "expense25F_usd")]
    pub expense_current_usd: f64,

    // Per-component cost rates, USD basis
    #[serde(rename = "materialRate24F_usd")]
    pub material_rate_prior_usd: f64,
    #[serde(rename = "materialRate25F_usd")]
    pub material_rate_current_usd: f64,
    #[serde(rename = "artworkRate24F_usd")]
    pub artwork_rate_prior_usd: f64,
    #[serde(rename = "artworkRate25F_usd")]
    pub artwork_rate_current_usd: f64,
    #[serde(rename = "laborRate24F_usd")]
    pub labor_rate_prior_usd: f64,
    #[serde(rename = "laborRate25F_usd")]
    pub labor_rate_current_usd: f64,
    #[serde(rename = "marginRate24F_usd")]
    pub margin_rate_prior_usd: f64,
    #[serde(rename = "marginRate25F_usd")]
    pub margin_rate_current_usd: f64,
    #[serde(rename = "expenseRate24F_usd")]
    pub expense_rate_prior_usd: f64,
    #[serde(rename = "expenseRate25F_usd")]
    pub expense_rate_current_usd: f64,

    // KRW basis
    #[serde(rename = "costRate24F_krw")]
    pub cost_rate_prior_krw: f64,
    #[serde(rename = "costRate25F_krw")]
    pub cost_rate_current_krw: f64,
    #[serde(rename = "costRateChange_krw")]
    pub cost_rate_delta_krw: f64,
    #[serde(rename = "avgTag24F_krw")]
    pub avg_tag_prior_krw: f64,
    #[serde(rename = "avgTag25F_krw")]
    pub avg_tag_current_krw: f64,
    #[serde(rename = "tagYoY_krw")]
    pub tag_yoy_krw: f64,
    #[serde(rename = "avgCost24F_krw")]
    pub avg_cost_prior_krw: f64,
    #[serde(rename = "avgCost25F_krw")]
    pub avg_cost_current_krw: f64,
    #[serde(rename = "costYoY_krw")]
    pub cost_yoy_krw: f64,
}

/// Per-category entry of the summary file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    #[serde(flatten)]
    pub stats: TotalStats,
}

/// Pre-computed summary file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(default)]
    pub total: Option<TotalStats>,
    #[serde(default)]
    pub categories: Vec<CategoryStats>,
}

impl SummaryData {
    pub fn category(&self, category: &str) -> Option<&TotalStats> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| &c.stats)
    }
}

/// Where a total row came from.
///
/// A summary-supplied total always wins over one rolled up from items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", content = "stats", rename_all = "lowercase")]
pub enum Total {
    Precomputed(TotalStats),
    Derived(TotalStats),
}

impl Total {
    pub fn stats(&self) -> &TotalStats {
        match self {
            Total::Precomputed(stats) | Total::Derived(stats) => stats,
        }
    }

    pub fn is_precomputed(&self) -> bool {
        matches!(self, Total::Precomputed(_))
    }

    pub fn source(&self) -> &'static str {
        match self {
            Total::Precomputed(_) => "precomputed",
            Total::Derived(_) => "derived",
        }
    }
}

/// One category's total row, with the number of items behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    /// Aggregated items in this category; 0 for summary-only categories
    pub item_count: usize,
    pub total: Total,
}

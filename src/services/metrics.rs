//! Derived metrics over aggregated totals
//!
//! All functions are pure and guard their denominators: a zero (or
//! negative) base yields 0 instead of NaN/infinity.

use serde::Serialize;

use crate::config::FxRates;
use crate::types::TotalStats;

/// Ratio to 100: `yoy(100, 120) == 120`, not a percent change.
pub fn yoy(prior: f64, current: f64) -> f64 {
    if prior > 0.0 {
        current / prior * 100.0
    } else {
        0.0
    }
}

/// Signed percentage-point change; negative means cheaper relative to tag.
pub fn cost_rate_delta(prior_rate: f64, current_rate: f64) -> f64 {
    current_rate - prior_rate
}

/// Portion of the KRW cost rate explained by currency conversion alone
pub fn fx_effect(rate_krw: f64, rate_usd: f64) -> f64 {
    rate_krw - rate_usd
}

/// Inverse of cost rate as a multiple (20% → 5.0)
pub fn blended_markup(rate: f64) -> f64 {
    if rate > 0.0 {
        1.0 / (rate / 100.0)
    } else {
        0.0
    }
}

/// Positive means improvement, the opposite sign of [`cost_rate_delta`].
pub fn markup_delta(prior_rate: f64, current_rate: f64) -> f64 {
    blended_markup(current_rate) - blended_markup(prior_rate)
}

/// Cost as a percentage of the tag price net of `tax_factor`
pub fn cost_rate(avg_cost: f64, avg_tag: f64, tax_factor: f64) -> f64 {
    if avg_tag > 0.0 && tax_factor > 0.0 {
        avg_cost / (avg_tag / tax_factor) * 100.0
    } else {
        0.0
    }
}

/// Headline metrics derived from a total row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub quantity_yoy: f64,
    pub tag_yoy: f64,
    pub cost_yoy: f64,
    pub fx_yoy: f64,
    pub cost_rate_delta_usd: f64,
    pub cost_rate_delta_krw: f64,
    /// KRW rate minus USD rate, current period
    pub fx_effect: f64,
    /// USD cost-rate change split by component, in percentage points.
    /// Material and artwork are reported together; the four sum to
    /// `cost_rate_delta_usd` for a derived total.
    pub material_artwork_rate_delta: f64,
    pub labor_rate_delta: f64,
    pub margin_rate_delta: f64,
    pub expense_rate_delta: f64,
    pub markup_prior: f64,
    pub markup_current: f64,
    pub markup_delta: f64,
    /// avg tag × quantity × prior FX
    pub tag_amount_prior_krw: f64,
    pub tag_amount_current_krw: f64,
    pub tag_amount_yoy: f64,
    /// avg cost × quantity
    pub cost_amount_prior_usd: f64,
    pub cost_amount_current_usd: f64,
    pub cost_amount_yoy: f64,
}

impl DerivedMetrics {
    pub fn from_total(total: &TotalStats, fx: FxRates) -> Self {
        let tag_amount_prior_krw = total.avg_tag_prior_usd * total.qty_prior * fx.prior;
        // current tag is valued at the prior rate so the comparison is FX-neutral
        let tag_amount_current_krw = total.avg_tag_current_usd * total.qty_current * fx.prior;
        let cost_amount_prior_usd = total.avg_cost_prior_usd * total.qty_prior;
        let cost_amount_current_usd = total.avg_cost_current_usd * total.qty_current;

        Self {
            quantity_yoy: yoy(total.qty_prior, total.qty_current),
            tag_yoy: yoy(total.avg_tag_prior_usd, total.avg_tag_current_usd),
            cost_yoy: yoy(total.avg_cost_prior_usd, total.avg_cost_current_usd),
            fx_yoy: yoy(fx.prior, fx.current),
            cost_rate_delta_usd: cost_rate_delta(
                total.cost_rate_prior_usd,
                total.cost_rate_current_usd,
            ),
            cost_rate_delta_krw: cost_rate_delta(
                total.cost_rate_prior_krw,
                total.cost_rate_current_krw,
            ),
            fx_effect: fx_effect(total.cost_rate_current_krw, total.cost_rate_current_usd),
            material_artwork_rate_delta: cost_rate_delta(
                total.material_rate_prior_usd + total.artwork_rate_prior_usd,
                total.material_rate_current_usd + total.artwork_rate_current_usd,
            ),
            labor_rate_delta: cost_rate_delta(
                total.labor_rate_prior_usd,
                total.labor_rate_current_usd,
            ),
            margin_rate_delta: cost_rate_delta(
                total.margin_rate_prior_usd,
                total.margin_rate_current_usd,
            ),
            expense_rate_delta: cost_rate_delta(
                total.expense_rate_prior_usd,
                total.expense_rate_current_usd,
            ),
            markup_prior: blended_markup(total.cost_rate_prior_usd),
            markup_current: blended_markup(total.cost_rate_current_usd),
            markup_delta: markup_delta(total.cost_rate_prior_usd, total.cost_rate_current_usd),
            tag_amount_prior_krw,
            tag_amount_current_krw,
            tag_amount_yoy: yoy(tag_amount_prior_krw, tag_amount_current_krw),
            cost_amount_prior_usd,
            cost_amount_current_usd,
            cost_amount_yoy: yoy(cost_amount_prior_usd, cost_amount_current_usd),
        }
    }
}

//! Plain-text report tables

use std::fmt::Write;

use seasoncost::services::DerivedMetrics;
use seasoncost::types::{AggregatedItem, CategoryTotal, PeriodComparison, Total};

const COMPARISON_HEADER: &str =
    "qty(prior)  qty(curr)  cost(prior)  cost(curr)  rate(prior)  rate(curr)   Δrate  costYoY";

fn comparison_columns(cmp: &PeriodComparison) -> String {
    format!(
        "{:>10}  {:>9}  {:>11.2}  {:>10.2}  {:>10.1}%  {:>9.1}%  {:>+6.1}  {:>7.1}",
        cmp.prior.quantity,
        cmp.current.quantity,
        cmp.prior.avg_total_cost(),
        cmp.current.avg_total_cost(),
        cmp.prior.cost_rate,
        cmp.current.cost_rate,
        cmp.cost_rate_delta,
        cmp.cost_yoy,
    )
}

pub fn render_items(items: &[AggregatedItem]) -> String {
    if items.is_empty() {
        return "No items.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:<20} {}", "category", "item", COMPARISON_HEADER);
    for item in items {
        let _ = writeln!(
            out,
            "{:<10} {:<20} {}",
            item.category,
            item.item_name,
            comparison_columns(&item.comparison)
        );
    }
    out
}

pub fn render_categories(categories: &[CategoryTotal]) -> String {
    if categories.is_empty() {
        return "No categories.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>5} {:<11} {}",
        "category", "items", "source", COMPARISON_HEADER
    );
    for entry in categories {
        let s = entry.total.stats();
        let _ = writeln!(
            out,
            "{:<10} {:>5} {:<11} {:>10.0}  {:>9.0}  {:>11.2}  {:>10.2}  {:>10.1}%  {:>9.1}%  {:>+6.1}  {:>7.1}",
            entry.category,
            entry.item_count,
            entry.total.source(),
            s.qty_prior,
            s.qty_current,
            s.avg_cost_prior_usd,
            s.avg_cost_current_usd,
            s.cost_rate_prior_usd,
            s.cost_rate_current_usd,
            s.cost_rate_current_usd - s.cost_rate_prior_usd,
            s.cost_yoy_usd,
        );
    }
    out
}

pub fn render_total(total: &Total) -> String {
    let s = total.stats();
    let mut out = String::new();
    let _ = writeln!(out, "Total ({})", total.source());
    let _ = writeln!(out, "{:<18} {:>12} {:>12} {:>10}", "", "prior", "current", "YoY/Δ");
    let _ = writeln!(
        out,
        "{:<18} {:>12.0} {:>12.0} {:>10.1}",
        "quantity", s.qty_prior, s.qty_current, s.qty_yoy
    );
    let _ = writeln!(
        out,
        "{:<18} {:>12.2} {:>12.2} {:>10.1}",
        "avg tag (USD)", s.avg_tag_prior_usd, s.avg_tag_current_usd, s.tag_yoy_usd
    );
    let _ = writeln!(
        out,
        "{:<18} {:>12.2} {:>12.2} {:>10.1}",
        "avg cost (USD)", s.avg_cost_prior_usd, s.avg_cost_current_usd, s.cost_yoy_usd
    );
    let _ = writeln!(
        out,
        "{:<18} {:>11.1}% {:>11.1}% {:>+10.1}",
        "cost rate (USD)", s.cost_rate_prior_usd, s.cost_rate_current_usd, s.cost_rate_delta_usd
    );
    let _ = writeln!(
        out,
        "{:<18} {:>11.1}% {:>11.1}% {:>+10.1}",
        "cost rate (KRW)", s.cost_rate_prior_krw, s.cost_rate_current_krw, s.cost_rate_delta_krw
    );
    for (label, prior, current) in [
        ("  material", s.material_prior_usd, s.material_current_usd),
        ("  artwork", s.artwork_prior_usd, s.artwork_current_usd),
        ("  labor", s.labor_prior_usd, s.labor_current_usd),
        ("  margin", s.margin_prior_usd, s.margin_current_usd),
        ("  expense", s.expense_prior_usd, s.expense_current_usd),
    ] {
        let _ = writeln!(
            out,
            "{:<18} {:>12.2} {:>12.2} {:>+10.2}",
            label,
            prior,
            current,
            current - prior
        );
    }
    out
}

pub fn render_metrics(m: &DerivedMetrics) -> String {
    let mut out = String::new();
    let rows = [
        ("quantity YoY", m.quantity_yoy),
        ("tag YoY", m.tag_yoy),
        ("cost YoY", m.cost_yoy),
        ("FX YoY", m.fx_yoy),
        ("cost rate Δ (USD, %p)", m.cost_rate_delta_usd),
        ("cost rate Δ (KRW, %p)", m.cost_rate_delta_krw),
        ("FX effect (%p)", m.fx_effect),
        ("  material+artwork Δ", m.material_artwork_rate_delta),
        ("  labor Δ", m.labor_rate_delta),
        ("  margin Δ", m.margin_rate_delta),
        ("  expense Δ", m.expense_rate_delta),
        ("markup (prior)", m.markup_prior),
        ("markup (current)", m.markup_current),
        ("markup Δ", m.markup_delta),
        ("tag amount YoY", m.tag_amount_yoy),
        ("cost amount YoY", m.cost_amount_yoy),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<24} {:>10.2}", label, value);
    }
    let _ = writeln!(
        out,
        "{:<24} {:>10.1} → {:.1}",
        "tag amount (M KRW)",
        m.tag_amount_prior_krw / 1_000_000.0,
        m.tag_amount_current_krw / 1_000_000.0
    );
    let _ = writeln!(
        out,
        "{:<24} {:>10.2} → {:.2}",
        "cost amount (M USD)",
        m.cost_amount_prior_usd / 1_000_000.0,
        m.cost_amount_current_usd / 1_000_000.0
    );
    out
}

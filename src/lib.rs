//! Seasonal product-cost aggregation
//!
//! Parses per-order cost exports, rolls them up into quantity-weighted
//! per-item, per-category and total statistics for a prior and a current
//! season, and derives YoY, cost-rate, FX-effect and markup figures.

pub mod config;
pub mod logging;
pub mod parsers;
pub mod services;
pub mod types;

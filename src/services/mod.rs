//! Services for cost aggregation and processing

pub mod aggregator;
pub mod data_loader;
pub mod metrics;
pub mod normalizer;

pub use aggregator::Aggregator;
pub use data_loader::{Analysis, DataLoaderService, LoadRequest};
pub use metrics::DerivedMetrics;
pub use normalizer::{fold_category, normalize_season_code};

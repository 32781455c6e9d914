//! Pre-computed summary JSON loader

use crate::types::{Result, SummaryData};
use std::fs;
use std::path::Path;

pub fn parse_summary(text: &str) -> Result<SummaryData> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_summary(path: &Path) -> Result<SummaryData> {
    let content = fs::read_to_string(path)?;
    let summary = parse_summary(&content)?;
    tracing::debug!(
        file = %path.display(),
        has_total = summary.total.is_some(),
        categories = summary.categories.len(),
        "loaded summary"
    );
    Ok(summary)
}

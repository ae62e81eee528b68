//! Per-platform rollup for the platform comparison chart.

use crate::row_metrics::{BaseMetrics, RatioMetrics, ValidatedRecord};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformAggregate {
    pub platform: String,
    #[serde(flatten)]
    pub base: BaseMetrics,
    #[serde(flatten)]
    pub ratios: RatioMetrics,
}

impl PlatformAggregate {
    fn from_totals(platform: String, base: BaseMetrics) -> Self {
        Self {
            platform,
            ratios: base.ratios(),
            base,
        }
    }
}

/// Sum base quantities per platform and re-derive ratios from the sums.
/// Platforms keep the order in which they first appear.
pub fn aggregate_by_platform(records: &[ValidatedRecord]) -> Vec<PlatformAggregate> {
    let mut order: Vec<(&str, BaseMetrics)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.platform.as_str()).or_insert_with(|| {
            order.push((record.platform.as_str(), BaseMetrics::default()));
            order.len() - 1
        });
        order[slot].1.accumulate(&record.base);
    }

    order
        .into_iter()
        .map(|(platform, base)| PlatformAggregate::from_totals(platform.to_string(), base))
        .collect()
}

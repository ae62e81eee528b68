//! Coarse spend summary for the overview panel: totals, averages and CTR.
//!
//! Derived from the same validated rows as the chart data, so the two never
//! disagree about which rows count.

use crate::row_metrics::ValidatedRecord;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSpendStats {
    pub platform: String,
    pub record_count: usize,
    pub total_spend: f64,
    pub total_clicks: u64,
    pub total_impressions: u64,
    pub average_spend: f64,
    /// Percentage, unlike the chart ratios.
    pub ctr: f64,
    pub cpc: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendSummary {
    pub total_records: usize,
    pub valid_records: usize,
    pub excluded_records: usize,
    pub platforms: Vec<String>,
    pub platform_count: usize,
    pub total_spend: f64,
    pub average_spend: f64,
    pub platform_stats: Vec<PlatformSpendStats>,
}

#[derive(Default)]
struct Accumulator {
    records: usize,
    spend: f64,
    clicks: u64,
    impressions: u64,
}

/// Money and percentages are reported to two decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Summarize `records`; `total_records` is the size of the input they were
/// validated from, so excluded rows still weigh on the overall average.
pub fn summarize(records: &[ValidatedRecord], total_records: usize) -> SpendSummary {
    let mut order: Vec<(&str, Accumulator)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.platform.as_str()).or_insert_with(|| {
            order.push((record.platform.as_str(), Accumulator::default()));
            order.len() - 1
        });
        let acc = &mut order[slot].1;
        acc.records += 1;
        acc.spend += record.base.cost;
        acc.clicks = acc.clicks.saturating_add(record.base.clicks);
        acc.impressions = acc.impressions.saturating_add(record.impressions);
    }

    let platform_stats: Vec<PlatformSpendStats> = order
        .into_iter()
        .map(|(platform, acc)| PlatformSpendStats {
            platform: platform.to_string(),
            record_count: acc.records,
            total_spend: round2(acc.spend),
            total_clicks: acc.clicks,
            total_impressions: acc.impressions,
            average_spend: if acc.records > 0 {
                round2(acc.spend / acc.records as f64)
            } else {
                0.0
            },
            ctr: if acc.impressions > 0 {
                round2(acc.clicks as f64 / acc.impressions as f64 * 100.0)
            } else {
                0.0
            },
            cpc: if acc.clicks > 0 {
                round2(acc.spend / acc.clicks as f64)
            } else {
                0.0
            },
        })
        .collect();

    let total_spend = round2(platform_stats.iter().map(|s| s.total_spend).sum());
    let total_records = total_records.max(records.len());

    SpendSummary {
        total_records,
        valid_records: records.len(),
        excluded_records: total_records - records.len(),
        platforms: platform_stats.iter().map(|s| s.platform.clone()).collect(),
        platform_count: platform_stats.len(),
        total_spend,
        average_spend: if total_records > 0 {
            round2(total_spend / total_records as f64)
        } else {
            0.0
        },
        platform_stats,
    }
}

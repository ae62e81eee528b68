//! Platform x month time series for the trend chart.

use crate::row_metrics::{BaseMetrics, RatioMetrics, ValidatedRecord};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MonthlyAggregate {
    /// `YYYY-MM`.
    pub month: String,
    #[serde(flatten)]
    pub base: BaseMetrics,
    #[serde(flatten)]
    pub ratios: RatioMetrics,
}

/// One platform's months, ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformSeries {
    pub platform: String,
    pub months: Vec<MonthlyAggregate>,
}

/// Platform -> monthly series, in first-seen platform order. Serializes as a
/// JSON object keyed by platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyChartData {
    series: Vec<PlatformSeries>,
}

impl MonthlyChartData {
    pub fn get(&self, platform: &str) -> Option<&[MonthlyAggregate]> {
        self.series
            .iter()
            .find(|s| s.platform == platform)
            .map(|s| s.months.as_slice())
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.platform.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl Serialize for MonthlyChartData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.series.len()))?;
        for s in &self.series {
            map.serialize_entry(&s.platform, &s.months)?;
        }
        map.end()
    }
}

/// Sum base quantities per (platform, month) and re-derive ratios from the
/// sums. Rows from the same calendar month merge regardless of how their
/// dates were written.
pub fn aggregate_by_platform_and_month(records: &[ValidatedRecord]) -> MonthlyChartData {
    let mut order: Vec<(&str, BTreeMap<String, BaseMetrics>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.platform.as_str()).or_insert_with(|| {
            order.push((record.platform.as_str(), BTreeMap::new()));
            order.len() - 1
        });
        order[slot]
            .1
            .entry(record.month())
            .or_default()
            .accumulate(&record.base);
    }

    let series = order
        .into_iter()
        .map(|(platform, months)| PlatformSeries {
            platform: platform.to_string(),
            months: months
                .into_iter()
                .map(|(month, base)| MonthlyAggregate {
                    month,
                    ratios: base.ratios(),
                    base,
                })
                .collect(),
        })
        .collect();

    MonthlyChartData { series }
}

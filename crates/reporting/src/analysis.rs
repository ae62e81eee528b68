//! Analysis entry point: raw rows in, chart-ready aggregates out.

use crate::monthly::{aggregate_by_platform_and_month, MonthlyChartData};
use crate::platform_aggregate::{aggregate_by_platform, PlatformAggregate};
use crate::row_metrics::{derive_row, RowIssue, RowRejection, ValidatedRecord};
use crate::summary::{summarize, SpendSummary};
use adlens_core::{PlatformRules, RawRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// The two tables the charts consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub platform_chart_data: Vec<PlatformAggregate>,
    pub monthly_chart_data: MonthlyChartData,
}

/// Outcome of running the row filter over an input collection.
#[derive(Debug, Clone, Default)]
pub struct DerivedRows {
    pub records: Vec<ValidatedRecord>,
    /// 0-based input position and reasons for every dropped row.
    pub rejected: Vec<(usize, RowRejection)>,
    pub total: usize,
}

/// Stateless analyzer bound to one platform rule table.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    rules: PlatformRules,
}

impl Analyzer {
    pub fn new(rules: PlatformRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &PlatformRules {
        &self.rules
    }

    /// Validate every row and derive per-row metrics.
    pub fn derive_rows(&self, rows: &[RawRecord]) -> DerivedRows {
        self.derive_all(rows.iter().map(Ok))
    }

    /// Same as [`Analyzer::derive_rows`] for an undecoded JSON document.
    /// Returns `None` when the document is not an array.
    pub fn derive_json(&self, input: &Value) -> Option<DerivedRows> {
        let items = input.as_array()?;
        let decoded: Vec<Result<RawRecord, RowIssue>> = items.iter().map(decode_row).collect();
        let rows = decoded.iter().map(|row| row.as_ref().map_err(Clone::clone));
        Some(self.derive_all(rows))
    }

    fn derive_all<'a>(
        &self,
        rows: impl Iterator<Item = Result<&'a RawRecord, RowIssue>>,
    ) -> DerivedRows {
        let mut derived = DerivedRows::default();
        for (i, row) in rows.enumerate() {
            derived.total += 1;
            let outcome = match row {
                Ok(raw) => derive_row(raw, &self.rules),
                Err(issue) => Err(RowRejection::from(issue)),
            };
            match outcome {
                Ok(record) => derived.records.push(record),
                Err(rejection) => derived.rejected.push((i, rejection)),
            }
        }

        if !derived.rejected.is_empty() {
            debug!(
                total = derived.total,
                dropped = derived.rejected.len(),
                "Dropped invalid rows"
            );
        }
        derived
    }

    /// Aggregate typed rows. Invalid rows are dropped silently.
    pub fn analyze(&self, rows: &[RawRecord]) -> AnalysisResult {
        aggregate(&self.derive_rows(rows).records)
    }

    /// Aggregate a decoded JSON document. Anything that is not an array is
    /// treated as no data.
    pub fn process_analysis_data(&self, input: &Value) -> AnalysisResult {
        match self.derive_json(input) {
            Some(derived) => aggregate(&derived.records),
            None => {
                debug!("Analysis input is not an array, returning empty result");
                AnalysisResult::default()
            }
        }
    }

    /// Aggregates plus the coarse spend summary over the same valid rows.
    pub fn process_with_summary(&self, input: &Value) -> AnalysisReport {
        let derived = self.derive_json(input).unwrap_or_default();
        AnalysisReport {
            analysis: aggregate(&derived.records),
            summary: summarize(&derived.records, derived.total),
        }
    }
}

/// Aggregates and summary together, as the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub summary: SpendSummary,
}

/// Run both aggregations over already-validated records.
pub fn aggregate(records: &[ValidatedRecord]) -> AnalysisResult {
    let result = AnalysisResult {
        platform_chart_data: aggregate_by_platform(records),
        monthly_chart_data: aggregate_by_platform_and_month(records),
    };
    debug!(
        records = records.len(),
        platforms = result.platform_chart_data.len(),
        "Aggregation complete"
    );
    result
}

/// Analyze a decoded JSON document with the built-in platform rules.
pub fn process_analysis_data(input: &Value) -> AnalysisResult {
    Analyzer::default().process_analysis_data(input)
}

pub(crate) fn decode_row(item: &Value) -> Result<RawRecord, RowIssue> {
    if !item.is_object() {
        return Err(RowIssue::NotAnObject);
    }
    RawRecord::deserialize(item).map_err(|e| RowIssue::Unreadable(e.to_string()))
}

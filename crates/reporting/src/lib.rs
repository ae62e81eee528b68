//! Ad-spend analytics: platform normalization, per-row metric derivation,
//! and the platform and platform x month rollups behind the charts.

pub mod analysis;
pub mod dates;
pub mod metric_catalog;
pub mod monthly;
pub mod platform_aggregate;
pub mod row_metrics;
pub mod summary;
pub mod validation;

pub use analysis::{process_analysis_data, AnalysisReport, AnalysisResult, Analyzer};
pub use metric_catalog::{format_metric, Metric};
pub use monthly::{aggregate_by_platform_and_month, MonthlyAggregate, MonthlyChartData};
pub use platform_aggregate::{aggregate_by_platform, PlatformAggregate};
pub use row_metrics::{derive_row, RatioMetrics, ValidatedRecord};
pub use summary::SpendSummary;
pub use validation::ValidationReport;

//! Per-row validation and metric derivation.

use crate::dates::{month_key, resolve_date};
use adlens_core::{FieldValue, PlatformRules, RawRecord};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Summable base quantities of a row or a group of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BaseMetrics {
    pub cost: f64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
}

impl BaseMetrics {
    pub fn accumulate(&mut self, other: &BaseMetrics) {
        self.cost += other.cost;
        self.clicks = self.clicks.saturating_add(other.clicks);
        self.conversions = self.conversions.saturating_add(other.conversions);
        self.revenue += other.revenue;
    }

    /// Ratios of these quantities. Zero denominators yield 0.
    pub fn ratios(&self) -> RatioMetrics {
        let clicks = self.clicks as f64;
        let conversions = self.conversions as f64;
        RatioMetrics {
            cpc: if self.clicks > 0 { self.cost / clicks } else { 0.0 },
            cvr: if self.clicks > 0 { conversions / clicks } else { 0.0 },
            roas: if self.cost > 0.0 { self.revenue / self.cost } else { 0.0 },
            roi: if self.cost > 0.0 {
                (self.revenue - self.cost) / self.cost
            } else {
                0.0
            },
        }
    }
}

/// Derived ratios, stored as fractions (0.1 means 10%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatioMetrics {
    pub cpc: f64,
    pub cvr: f64,
    pub roas: f64,
    pub roi: f64,
}

/// A row that passed validation, with its canonical platform and ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRecord {
    pub platform: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub base: BaseMetrics,
    /// Not required for validity; 0 when absent.
    pub impressions: u64,
    #[serde(flatten)]
    pub ratios: RatioMetrics,
}

impl ValidatedRecord {
    pub fn month(&self) -> String {
        month_key(self.date)
    }
}

/// Why a row was left out of the aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowIssue {
    #[error("row is not an object")]
    NotAnObject,
    #[error("row could not be read: {0}")]
    Unreadable(String),
    #[error("platform is missing")]
    MissingPlatform,
    #[error("platform is not a text or number")]
    InvalidPlatform,
    #[error("date is missing")]
    MissingDate,
    #[error("date is not a recognizable calendar date")]
    InvalidDate,
    #[error("{0} is missing")]
    MissingField(&'static str),
    #[error("{0} is not a number")]
    InvalidNumber(&'static str),
    #[error("{0} is negative")]
    NegativeValue(&'static str),
}

/// Every issue found on a rejected row, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub issues: Vec<RowIssue>,
}

impl From<RowIssue> for RowRejection {
    fn from(issue: RowIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

/// Validate one raw row and derive its metrics.
///
/// A row is kept only when it has a platform, a resolvable date, and finite
/// non-negative cost, clicks, conversions and revenue.
pub fn derive_row(
    raw: &RawRecord,
    rules: &PlatformRules,
) -> Result<ValidatedRecord, RowRejection> {
    let mut issues = Vec::new();

    let platform = match raw.platform.as_ref().filter(|v| !v.is_blank()) {
        Some(value) => match value.as_text() {
            Some(label) => Some(rules.normalize(Some(&*label))),
            None => {
                issues.push(RowIssue::InvalidPlatform);
                None
            }
        },
        None => {
            issues.push(RowIssue::MissingPlatform);
            None
        }
    };

    let date = match raw.date.as_ref().filter(|v| !v.is_blank()) {
        Some(value) => {
            let resolved = resolve_date(value);
            if resolved.is_none() {
                issues.push(RowIssue::InvalidDate);
            }
            resolved
        }
        None => {
            issues.push(RowIssue::MissingDate);
            None
        }
    };

    let cost = parse_amount("cost", raw.cost_cell(), &mut issues);
    let clicks = parse_count("clicks", raw.clicks.as_ref(), &mut issues);
    let conversions = parse_count("conversions", raw.conversions.as_ref(), &mut issues);
    let revenue = parse_amount("revenue", raw.revenue.as_ref(), &mut issues);

    match (platform, date, cost, clicks, conversions, revenue) {
        (
            Some(platform),
            Some(date),
            Some(cost),
            Some(clicks),
            Some(conversions),
            Some(revenue),
        ) => {
            let base = BaseMetrics {
                cost,
                clicks,
                conversions,
                revenue,
            };
            let impressions = raw
                .impressions
                .as_ref()
                .and_then(FieldValue::parse_int)
                .filter(|n| *n > 0)
                .unwrap_or(0) as u64;

            Ok(ValidatedRecord {
                platform,
                date,
                base,
                impressions,
                ratios: base.ratios(),
            })
        }
        _ => Err(RowRejection { issues }),
    }
}

fn parse_amount(
    field: &'static str,
    value: Option<&FieldValue>,
    issues: &mut Vec<RowIssue>,
) -> Option<f64> {
    let Some(value) = value.filter(|v| !v.is_blank()) else {
        issues.push(RowIssue::MissingField(field));
        return None;
    };
    match value.parse_float() {
        Some(n) if !n.is_finite() => {
            issues.push(RowIssue::InvalidNumber(field));
            None
        }
        Some(n) if n < 0.0 => {
            issues.push(RowIssue::NegativeValue(field));
            None
        }
        Some(n) => Some(n),
        None => {
            issues.push(RowIssue::InvalidNumber(field));
            None
        }
    }
}

fn parse_count(
    field: &'static str,
    value: Option<&FieldValue>,
    issues: &mut Vec<RowIssue>,
) -> Option<u64> {
    let Some(value) = value.filter(|v| !v.is_blank()) else {
        issues.push(RowIssue::MissingField(field));
        return None;
    };
    match value.parse_int() {
        Some(n) if n < 0 => {
            issues.push(RowIssue::NegativeValue(field));
            None
        }
        Some(n) => Some(n as u64),
        None => {
            issues.push(RowIssue::InvalidNumber(field));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> PlatformRules {
        PlatformRules::default()
    }

    #[test]
    fn test_derive_valid_row() {
        let raw = RawRecord::new("google ads", "2024-01-15", "100", "50", "5", "300");
        let row = derive_row(&raw, &rules()).unwrap();

        assert_eq!(row.platform, "Google");
        assert_eq!(row.month(), "2024-01");
        assert_eq!(row.base.clicks, 50);
        assert!((row.ratios.cpc - 2.0).abs() < f64::EPSILON);
        assert!((row.ratios.cvr - 0.1).abs() < f64::EPSILON);
        assert!((row.ratios.roas - 3.0).abs() < f64::EPSILON);
        assert!((row.ratios.roi - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_clicks_guard() {
        let raw = RawRecord::new("Naver", "2024-01-01", "100", "0", "0", "250");
        let row = derive_row(&raw, &rules()).unwrap();

        assert_eq!(row.ratios.cpc, 0.0);
        assert_eq!(row.ratios.cvr, 0.0);
        assert!((row.ratios.roas - 2.5).abs() < f64::EPSILON);
        assert!((row.ratios.roi - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_cost_guard() {
        let raw = RawRecord::new("Kakao", "2024-01-01", "0", "10", "1", "50");
        let row = derive_row(&raw, &rules()).unwrap();

        assert_eq!(row.ratios.roas, 0.0);
        assert_eq!(row.ratios.roi, 0.0);
        assert_eq!(row.ratios.cpc, 0.0);
        assert!((row.ratios.cvr - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_loss_making_row_has_negative_roi() {
        let raw = RawRecord::new("Meta", "2024-01-01", "200", "40", "2", "50");
        let row = derive_row(&raw, &rules()).unwrap();
        assert!((row.ratios.roi - (-0.75)).abs() < 1e-12);
    }

    #[test]
    fn test_integer_fields_truncate() {
        let raw = RawRecord::new("Meta", "2024-01-01", "10.5", "12.9", "3.2", "1e2");
        let row = derive_row(&raw, &rules()).unwrap();
        assert_eq!(row.base.clicks, 12);
        assert_eq!(row.base.conversions, 3);
        assert!((row.base.cost - 10.5).abs() < f64::EPSILON);
        assert!((row.base.revenue - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_cost_is_rejected() {
        let mut raw = RawRecord::new("Google", "2024-01-01", "100", "10", "1", "50");
        raw.cost = None;
        let err = derive_row(&raw, &rules()).unwrap_err();
        assert_eq!(err.issues, vec![RowIssue::MissingField("cost")]);
    }

    #[test]
    fn test_all_issues_are_collected() {
        let raw = RawRecord {
            platform: Some("".into()),
            date: Some("someday".into()),
            cost: Some("abc".into()),
            clicks: Some("-3".into()),
            conversions: None,
            revenue: Some(FieldValue::Other(serde_json::Value::Bool(false))),
            ..RawRecord::default()
        };
        let err = derive_row(&raw, &rules()).unwrap_err();
        assert_eq!(
            err.issues,
            vec![
                RowIssue::MissingPlatform,
                RowIssue::InvalidDate,
                RowIssue::InvalidNumber("cost"),
                RowIssue::NegativeValue("clicks"),
                RowIssue::MissingField("conversions"),
                RowIssue::InvalidNumber("revenue"),
            ]
        );
    }

    #[test]
    fn test_serial_date_row() {
        let mut raw = RawRecord::new("TikTok", "", "10", "1", "0", "0");
        raw.date = Some(FieldValue::Number(44927.0));
        let row = derive_row(&raw, &rules()).unwrap();
        assert_eq!(row.month(), "2023-01");
    }

    #[test]
    fn test_impressions_are_optional() {
        let raw = RawRecord::new("Google", "2024-01-01", "10", "1", "0", "0");
        assert_eq!(derive_row(&raw, &rules()).unwrap().impressions, 0);

        let raw = raw.with_impressions("n/a");
        assert_eq!(derive_row(&raw, &rules()).unwrap().impressions, 0);

        let raw = raw.with_impressions("1200");
        assert_eq!(derive_row(&raw, &rules()).unwrap().impressions, 1200);
    }

    #[test]
    fn test_numeric_platform_label_is_kept() {
        let mut raw = RawRecord::new("", "2024-01-01", "10", "1", "0", "0");
        raw.platform = Some(FieldValue::Number(7.0));
        assert_eq!(derive_row(&raw, &rules()).unwrap().platform, "7");
    }

    #[test]
    fn test_platform_without_text_form_is_invalid() {
        let mut raw = RawRecord::new("", "2024-01-01", "10", "1", "0", "0");
        raw.platform = Some(FieldValue::Other(serde_json::Value::Bool(true)));
        let err = derive_row(&raw, &rules()).unwrap_err();
        assert_eq!(err.issues, vec![RowIssue::InvalidPlatform]);

        raw.platform = Some(FieldValue::Other(serde_json::json!({"name": "Google"})));
        let err = derive_row(&raw, &rules()).unwrap_err();
        assert_eq!(err.issues, vec![RowIssue::InvalidPlatform]);
    }

    #[test]
    fn test_spend_column_stands_in_for_cost() {
        let mut raw = RawRecord::new("Meta", "2024-01-01", "", "10", "1", "60");
        raw.spend = Some("30".into());
        let row = derive_row(&raw, &rules()).unwrap();
        assert!((row.base.cost - 30.0).abs() < f64::EPSILON);

        raw.cost = Some("20".into());
        let row = derive_row(&raw, &rules()).unwrap();
        assert!((row.base.cost - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_count_sums_saturate() {
        let huge = "9000000000000000000";
        let raw = RawRecord::new("Google", "2024-01-01", "10", huge, "1", "0");
        let row = derive_row(&raw, &rules()).unwrap();

        let mut total = BaseMetrics::default();
        for _ in 0..3 {
            total.accumulate(&row.base);
        }
        assert_eq!(total.clicks, u64::MAX);
        assert_eq!(total.conversions, 3);
        assert!(total.ratios().cpc >= 0.0);
    }
}

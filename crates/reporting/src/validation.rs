//! Row-level data-quality report for an upload, listing what the analysis
//! would silently drop and why.

use crate::analysis::Analyzer;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    /// 1-based, matching the row numbers people see in a spreadsheet.
    pub row: usize,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub total_rows: usize,
    pub valid_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_error: Option<String>,
    pub errors: Vec<RowError>,
}

impl Analyzer {
    /// Check every row of a decoded document against the analysis filter.
    pub fn validate_data(&self, input: &Value) -> ValidationReport {
        let Some(derived) = self.derive_json(input) else {
            return ValidationReport {
                is_valid: false,
                total_rows: 0,
                valid_rows: 0,
                input_error: Some("input is not an array of rows".to_string()),
                errors: Vec::new(),
            };
        };

        let errors: Vec<RowError> = derived
            .rejected
            .iter()
            .map(|(i, rejection)| RowError {
                row: i + 1,
                reasons: rejection.issues.iter().map(ToString::to_string).collect(),
            })
            .collect();

        ValidationReport {
            is_valid: errors.is_empty(),
            total_rows: derived.total,
            valid_rows: derived.records.len(),
            input_error: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_input_is_valid() {
        let input = json!([
            {"platform": "Naver", "date": "2024-01-01", "cost": 1, "clicks": 1, "conversions": 0, "revenue": 0}
        ]);
        let report = Analyzer::default().validate_data(&input);
        assert!(report.is_valid);
        assert_eq!(report.valid_rows, 1);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_reports_every_reason_with_row_numbers() {
        let input = json!([
            {"platform": "Naver", "date": "2024-01-01", "cost": 1, "clicks": 1, "conversions": 0, "revenue": 0},
            {"platform": "", "cost": "abc", "clicks": 1, "conversions": 0, "revenue": 0},
            7
        ]);
        let report = Analyzer::default().validate_data(&input);

        assert!(!report.is_valid);
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.valid_rows, 1);
        assert_eq!(
            report.errors,
            vec![
                RowError {
                    row: 2,
                    reasons: vec![
                        "platform is missing".to_string(),
                        "date is missing".to_string(),
                        "cost is not a number".to_string(),
                    ],
                },
                RowError {
                    row: 3,
                    reasons: vec!["row is not an object".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_cost_and_spend_row_is_valid() {
        let input = json!([
            {"platform": "Google", "date": "2024-01-01", "cost": "100", "spend": "100", "clicks": "10", "conversions": "1", "revenue": "200"},
            {"platform": true, "date": "2024-01-01", "cost": 1, "clicks": 1, "conversions": 0, "revenue": 0}
        ]);
        let report = Analyzer::default().validate_data(&input);

        assert_eq!(report.valid_rows, 1);
        assert_eq!(
            report.errors,
            vec![RowError {
                row: 2,
                reasons: vec!["platform is not a text or number".to_string()],
            }]
        );
    }

    #[test]
    fn test_non_array_input() {
        let report = Analyzer::default().validate_data(&json!({"rows": []}));
        assert!(!report.is_valid);
        assert!(report.input_error.is_some());
        assert_eq!(report.total_rows, 0);
    }
}

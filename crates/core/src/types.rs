use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single loosely-typed spreadsheet cell. Decoders hand over whatever the
/// sheet contained: numbers, text, or something else entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    /// Text view of the cell. Numbers are rendered the way a sheet would show
    /// them; booleans, arrays and objects have no text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Other(_) => None,
        }
    }

    /// True when the cell carries no usable content.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
            FieldValue::Other(v) => v.is_null(),
        }
    }

    /// Floating-point reading of the cell. Text is read by its leading
    /// numeric prefix, so `"30abc"` yields 30 and `"abc"` yields nothing.
    pub fn parse_float(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => float_prefix(s),
            FieldValue::Other(_) => None,
        }
    }

    /// Integer reading of the cell. Fractions are truncated toward zero.
    pub fn parse_int(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => int_prefix(s),
            FieldValue::Other(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

/// One advertising row as decoded from a spreadsheet, CSV export, or backend
/// response. Nothing is guaranteed about any field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<FieldValue>,
    /// Older exports label the cost column `spend`. Read through
    /// [`RawRecord::cost_cell`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversions: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<FieldValue>,
    /// Only used by the spend summary; never required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<FieldValue>,
}

impl RawRecord {
    /// Convenience constructor for a fully-populated text row.
    pub fn new(
        platform: &str,
        date: &str,
        cost: &str,
        clicks: &str,
        conversions: &str,
        revenue: &str,
    ) -> Self {
        Self {
            platform: Some(platform.into()),
            date: Some(date.into()),
            cost: Some(cost.into()),
            spend: None,
            clicks: Some(clicks.into()),
            conversions: Some(conversions.into()),
            revenue: Some(revenue.into()),
            impressions: None,
        }
    }

    /// The cost cell: `cost` when it has content, otherwise `spend`.
    pub fn cost_cell(&self) -> Option<&FieldValue> {
        self.cost
            .as_ref()
            .filter(|v| !v.is_blank())
            .or(self.spend.as_ref())
    }

    pub fn with_impressions(mut self, impressions: impl Into<FieldValue>) -> Self {
        self.impressions = Some(impressions.into());
        self
    }
}

/// Longest leading decimal literal of `s` (after leading whitespace):
/// optional sign, digits, optional fraction, optional exponent.
fn float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Longest leading integer literal of `s` (after leading whitespace).
fn int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_prefix_parsing() {
        assert_eq!(FieldValue::from("100").parse_float(), Some(100.0));
        assert_eq!(FieldValue::from("  12.5 ").parse_float(), Some(12.5));
        assert_eq!(FieldValue::from("30abc").parse_float(), Some(30.0));
        assert_eq!(FieldValue::from(".5").parse_float(), Some(0.5));
        assert_eq!(FieldValue::from("1e3").parse_float(), Some(1000.0));
        assert_eq!(FieldValue::from("2e").parse_float(), Some(2.0));
        assert_eq!(FieldValue::from("-4").parse_float(), Some(-4.0));
        assert_eq!(FieldValue::from("abc").parse_float(), None);
        assert_eq!(FieldValue::from("").parse_float(), None);
        assert_eq!(FieldValue::from(".").parse_float(), None);
        assert_eq!(FieldValue::Other(serde_json::Value::Bool(true)).parse_float(), None);
    }

    #[test]
    fn test_int_prefix_parsing() {
        assert_eq!(FieldValue::from("50").parse_int(), Some(50));
        assert_eq!(FieldValue::from("12.9").parse_int(), Some(12));
        assert_eq!(FieldValue::from("7 clicks").parse_int(), Some(7));
        assert_eq!(FieldValue::from(12.9).parse_int(), Some(12));
        assert_eq!(FieldValue::from("x1").parse_int(), None);
        assert_eq!(FieldValue::Number(f64::NAN).parse_int(), None);
    }

    #[test]
    fn test_raw_record_deserializes_mixed_cells() {
        let json = serde_json::json!({
            "platform": "Google",
            "date": 44927,
            "spend": "100",
            "clicks": 50,
            "conversions": null,
            "revenue": true,
            "campaign": "ignored"
        });
        let record: RawRecord = serde_json::from_value(json).unwrap();

        assert_eq!(record.platform, Some(FieldValue::Text("Google".into())));
        assert_eq!(record.date, Some(FieldValue::Number(44927.0)));
        assert_eq!(record.cost, None);
        assert_eq!(record.cost_cell(), Some(&FieldValue::Text("100".into())));
        assert_eq!(record.clicks, Some(FieldValue::Number(50.0)));
        assert_eq!(record.conversions, None);
        assert_eq!(
            record.revenue,
            Some(FieldValue::Other(serde_json::Value::Bool(true)))
        );
        assert_eq!(record.impressions, None);
    }

    #[test]
    fn test_cost_column_wins_over_spend() {
        let json = serde_json::json!({
            "platform": "Google",
            "cost": "100",
            "spend": "90"
        });
        let record: RawRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.cost_cell(), Some(&FieldValue::Text("100".into())));

        let json = serde_json::json!({"cost": "", "spend": 90});
        let record: RawRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.cost_cell(), Some(&FieldValue::Number(90.0)));

        assert_eq!(RawRecord::default().cost_cell(), None);
    }

    #[test]
    fn test_blank_cells() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(FieldValue::Other(serde_json::Value::Null).is_blank());
        assert!(!FieldValue::from(0.0).is_blank());
        assert!(!FieldValue::from("x").is_blank());
    }
}

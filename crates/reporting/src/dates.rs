//! Date resolution for spreadsheet rows.
//!
//! Dates arrive either as text (`2024-01-15`, `2024/01/15`,
//! `2024-01-15T09:30:00Z`, `2024-01`) or as spreadsheet serial day counts.
//! Serials are converted here and nowhere else.

use adlens_core::FieldValue;
use chrono::{Duration, NaiveDate};

/// Serial day numbers count from 1899-12-30 (the epoch that absorbs the
/// 1900 leap-year bug).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Roughly +/- 8000 years; keeps the day arithmetic well inside chrono's range.
const MAX_SERIAL_DAYS: f64 = 3_000_000.0;

/// Numeric text below this is a year or a count, not a serial (10000 is
/// 1927-05-18).
const MIN_TEXT_SERIAL: f64 = 10_000.0;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Calendar date for a spreadsheet serial. Time-of-day fractions are dropped.
pub fn from_spreadsheet_serial(days: f64) -> Option<NaiveDate> {
    if !days.is_finite() || days.abs() > MAX_SERIAL_DAYS {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::days(days.floor() as i64))
}

/// Resolve a raw date cell to a calendar date. Numeric cells are always
/// serials. Numeric text is a serial only from [`MIN_TEXT_SERIAL`] up, so a
/// year-only label such as `"2024"` is rejected instead of landing in 1905.
pub fn resolve_date(value: &FieldValue) -> Option<NaiveDate> {
    match value {
        FieldValue::Number(days) => from_spreadsheet_serial(*days),
        FieldValue::Text(text) => {
            let text = text.trim();
            match text.parse::<f64>() {
                Ok(days) if days >= MIN_TEXT_SERIAL => from_spreadsheet_serial(days),
                Ok(_) => None,
                Err(_) => parse_date_text(text),
            }
        }
        FieldValue::Other(_) => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if let Some(date) = parse_plain_date(text) {
        return Some(date);
    }

    // Timestamps: the leading calendar date is what counts.
    if text.len() > 10 && text.is_char_boundary(10) {
        if let Some(date) = parse_plain_date(&text[..10]) {
            return Some(date);
        }
    }

    // Month-only labels such as "2024-03".
    if text.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d").ok();
    }

    None
}

fn parse_plain_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// `YYYY-MM` key for a date. Zero-padded, so lexical order is calendar order.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

//! Metric definitions and display formatting.
//!
//! Ratios are stored as fractions. CPC renders as a rounded currency amount;
//! CVR, ROAS and ROI render as percentages.

use adlens_core::config::DisplayConfig;
use adlens_core::AdlensError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cpc,
    Cvr,
    Roas,
    Roi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    Up,
    Down,
}

/// Static description shown next to a metric's chart.
#[derive(Debug, Clone, Serialize)]
pub struct MetricInfo {
    pub key: Metric,
    pub name: &'static str,
    pub full_name: &'static str,
    pub goal: &'static str,
    pub goal_direction: GoalDirection,
    pub summary: &'static str,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Cpc, Metric::Cvr, Metric::Roas, Metric::Roi];

    pub fn info(self) -> MetricInfo {
        match self {
            Metric::Cpc => MetricInfo {
                key: self,
                name: "CPC",
                full_name: "Cost Per Click",
                goal: "Lower is better",
                goal_direction: GoalDirection::Down,
                summary: "Average spend paid for one click.",
            },
            Metric::Cvr => MetricInfo {
                key: self,
                name: "CVR",
                full_name: "Conversion Rate",
                goal: "Higher is better",
                goal_direction: GoalDirection::Up,
                summary: "Share of clicks that turned into conversions.",
            },
            Metric::Roas => MetricInfo {
                key: self,
                name: "ROAS",
                full_name: "Return On Ad Spend",
                goal: "Higher is better",
                goal_direction: GoalDirection::Up,
                summary: "Revenue earned per unit of ad spend.",
            },
            Metric::Roi => MetricInfo {
                key: self,
                name: "ROI",
                full_name: "Return On Investment",
                goal: "Higher is better",
                goal_direction: GoalDirection::Up,
                summary: "Profit after ad spend, relative to that spend. Negative means a loss.",
            },
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

impl FromStr for Metric {
    type Err = AdlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpc" => Ok(Metric::Cpc),
            "cvr" => Ok(Metric::Cvr),
            "roas" => Ok(Metric::Roas),
            "roi" => Ok(Metric::Roi),
            other => Err(AdlensError::Input(format!("unknown metric: {}", other))),
        }
    }
}

/// Render a stored metric value for display.
pub fn format_metric(metric: Metric, value: f64, display: &DisplayConfig) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    match metric {
        Metric::Cpc => format!(
            "{}{}",
            display.currency_symbol,
            group_thousands(value.round() as i64)
        ),
        Metric::Cvr | Metric::Roas | Metric::Roi => {
            format!("{:.*}%", display.percent_decimals, value * 100.0)
        }
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

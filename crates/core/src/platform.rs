//! Platform-name normalization policy.
//!
//! Free-text channel labels ("FACEBOOK Ads", "네이버 검색광고", "gdn_display")
//! are reduced to a canonical platform by an ordered list of substring rules.
//! The first rule with a matching pattern wins; unmatched labels are kept
//! verbatim and become their own bucket.

use crate::error::{AdlensError, AdlensResult};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const GOOGLE: &str = "Google";
pub const NAVER: &str = "Naver";
pub const META: &str = "Meta";
pub const KAKAO: &str = "Kakao";
pub const TIKTOK: &str = "TikTok";
pub const UNKNOWN: &str = "Unknown";

/// One canonical platform and the substrings that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRule {
    pub platform: String,
    /// Matched case-insensitively anywhere in the label.
    pub patterns: Vec<String>,
}

impl PlatformRule {
    pub fn new(platform: &str, patterns: &[&str]) -> Self {
        Self {
            platform: platform.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn matches(&self, lowered_label: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| lowered_label.contains(p.to_lowercase().as_str()))
    }
}

/// Ordered rule table. Rule order is priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRules {
    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,
    #[serde(default = "default_rules")]
    pub rules: Vec<PlatformRule>,
}

fn default_unknown_label() -> String {
    UNKNOWN.to_string()
}

// NOTE: bare "ads" sits in the Google family, ahead of Kakao and TikTok, so
// "TikTok Ads" lands in Google. Kept as shipped; tighten via config.
fn default_rules() -> Vec<PlatformRule> {
    vec![
        PlatformRule::new(META, &["meta", "facebook", "instagram", "fb", "ig"]),
        PlatformRule::new(NAVER, &["naver", "네이버", "nvr"]),
        PlatformRule::new(GOOGLE, &["google", "구글", "gdn", "ads"]),
        PlatformRule::new(KAKAO, &["kakao", "카카오", "kak"]),
        PlatformRule::new(TIKTOK, &["tiktok", "틱톡", "tt"]),
    ]
}

impl Default for PlatformRules {
    fn default() -> Self {
        Self {
            unknown_label: default_unknown_label(),
            rules: default_rules(),
        }
    }
}

impl PlatformRules {
    /// Map a raw label to its canonical platform.
    pub fn normalize(&self, label: Option<&str>) -> String {
        let label = match label {
            Some(l) if !l.trim().is_empty() => l,
            _ => return self.unknown_label.clone(),
        };

        let lowered = label.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.platform.clone())
            .unwrap_or_else(|| label.to_string())
    }

    /// Reject tables that would match everything or produce empty buckets.
    pub fn validate(&self) -> AdlensResult<()> {
        if self.unknown_label.trim().is_empty() {
            return Err(AdlensError::Config(
                "platforms.unknown_label must not be empty".to_string(),
            ));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.platform.trim().is_empty() {
                return Err(AdlensError::Config(format!(
                    "platforms.rules[{}] has an empty platform name",
                    i
                )));
            }
            if rule.patterns.iter().any(|p| p.is_empty()) {
                return Err(AdlensError::Config(format!(
                    "platforms.rules[{}] ({}) has an empty pattern",
                    i, rule.platform
                )));
            }
        }
        Ok(())
    }
}

/// Normalize with the built-in rule table.
pub fn normalize_platform(label: Option<&str>) -> String {
    static DEFAULT_RULES: OnceLock<PlatformRules> = OnceLock::new();
    DEFAULT_RULES
        .get_or_init(PlatformRules::default)
        .normalize(label)
}

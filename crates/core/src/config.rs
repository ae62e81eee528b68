use crate::error::AdlensResult;
use crate::platform::PlatformRules;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Root application configuration. Loaded from an optional TOML file, then
/// environment variables with the prefix `ADLENS__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub platforms: PlatformRules,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// How metric values are rendered for people.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_percent_decimals")]
    pub percent_decimals: usize,
}

// Default functions
fn default_log_filter() -> String {
    "adlens=info".to_string()
}
fn default_currency_symbol() -> String {
    "₩".to_string()
}
fn default_percent_decimals() -> usize {
    1
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            percent_decimals: default_percent_decimals(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            platforms: PlatformRules::default(),
            display: DisplayConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and the environment.
    /// Environment values win over the file.
    pub fn load(path: Option<&Path>) -> AdlensResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "Loading config file");
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("ADLENS")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AdlensResult<()> {
        self.platforms.validate()
    }
}

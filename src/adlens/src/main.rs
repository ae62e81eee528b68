//! adlens — ad-spend analytics from the command line.
//!
//! Reads decoded spreadsheet rows (a JSON array of objects) and prints the
//! platform and monthly chart tables, a validation report, or formatted
//! metric values.

use adlens_core::config::AppConfig;
use adlens_reporting::metric_catalog::Metric;
use adlens_reporting::{format_metric, Analyzer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "adlens")]
#[command(about = "Platform and monthly ad performance (CPC, CVR, ROAS, ROI) from spreadsheet rows")]
#[command(version)]
struct Cli {
    /// TOML config file (platform rules, display settings)
    #[arg(long, env = "ADLENS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate rows into platform and monthly chart data
    Analyze {
        /// JSON file with the decoded rows, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Include the spend/CTR summary panel
        #[arg(long, default_value_t = false)]
        summary: bool,

        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Report which rows the analysis would drop and why
    Validate {
        #[arg(short, long, default_value = "-")]
        input: String,

        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Render one metric value the way the dashboard shows it
    Format {
        /// cpc, cvr, roas or roi
        metric: Metric,
        /// Stored value (ratios are fractions, e.g. 0.125)
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Print the metric catalog
    Metrics {
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(cli.config.as_deref());
    let log_filter = loaded
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| AppConfig::default().log_filter);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(
        rules = config.platforms.rules.len(),
        currency = %config.display.currency_symbol,
        "Configuration loaded"
    );

    let analyzer = Analyzer::new(config.platforms.clone());

    match cli.command {
        Command::Analyze {
            input,
            summary,
            pretty,
        } => {
            let rows = read_input(&input)?;
            if summary {
                let report = analyzer.process_with_summary(&rows);
                info!(
                    valid = report.summary.valid_records,
                    excluded = report.summary.excluded_records,
                    platforms = report.summary.platform_count,
                    "Analysis complete"
                );
                emit(&report, pretty)?;
            } else {
                let result = analyzer.process_analysis_data(&rows);
                info!(
                    platforms = result.platform_chart_data.len(),
                    "Analysis complete"
                );
                emit(&result, pretty)?;
            }
        }
        Command::Validate { input, pretty } => {
            let rows = read_input(&input)?;
            let report = analyzer.validate_data(&rows);
            if !report.is_valid {
                warn!(
                    invalid_rows = report.errors.len(),
                    total_rows = report.total_rows,
                    "Input has rows that will be excluded"
                );
            }
            emit(&report, pretty)?;
        }
        Command::Format { metric, value } => {
            println!("{}", format_metric(metric, value, &config.display));
        }
        Command::Metrics { pretty } => {
            let catalog: Vec<_> = Metric::ALL.iter().map(|m| m.info()).collect();
            emit(&catalog, pretty)?;
        }
    }

    Ok(())
}

/// Read and decode the JSON document at `path` ("-" for stdin).
fn read_input(path: &str) -> anyhow::Result<serde_json::Value> {
    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read rows from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
    };

    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path))
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

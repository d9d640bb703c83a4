//! Covered Calls CLI
//!
//! Fetches option chains for the configured tickers and writes ranked
//! covered call candidates to CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use covered_calls::prelude::*;

#[derive(Parser)]
#[command(
    name = "covered_calls",
    about = "Screen option chains for covered call candidates"
)]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tickers to screen (e.g., AAPL MSFT SPY).
    #[arg(long, num_args = 1..)]
    tickers: Option<Vec<String>>,

    /// Output CSV path.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Days a cached response stays fresh.
    #[arg(long)]
    cache_days: Option<i64>,

    /// Cache directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Always hit the network.
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// As-of date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<ScreenConfig> {
        let mut config = match &self.config {
            Some(path) => ScreenConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ScreenConfig::default(),
        };

        if let Some(tickers) = &self.tickers {
            config.tickers = tickers.iter().map(|t| t.to_uppercase()).collect();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(days) = self.cache_days {
            config.cache.max_age_days = days;
        }
        if let Some(dir) = &self.cache_dir {
            config.cache.cache_dir = dir.clone();
        }
        if self.no_cache {
            config.cache.enabled = false;
        }

        config.validate()?;
        Ok(config)
    }

    fn as_of(&self) -> Result<NaiveDate> {
        match &self.as_of {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid --as-of date: {}", s)),
            None => Ok(Local::now().date_naive()),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    // Captured once; every ticker is measured against the same date
    let today = cli.as_of()?;

    tracing::info!(
        "Screening {} tickers as of {} (cache: {} day(s) at {:?})",
        config.tickers.len(),
        today,
        config.cache.max_age_days,
        config.cache.cache_dir
    );

    let client = YahooClient::new(config.cache.clone())?;
    let report = Screener::new(client, config).run(today)?;

    println!(
        "{} of {} contracts written to {}",
        report.stats.selected,
        report.total_rows,
        report.output.display()
    );

    Ok(())
}

//! Configuration for the screening run

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{OptionType, ScreenerError, ScreenerResult};
use crate::data::CacheConfig;

/// Tickers screened when no list is configured
pub const DEFAULT_TICKERS: [&str; 7] = ["AAPL", "GOOG", "AMZN", "MSFT", "SPY", "FB", "QQQ"];

/// Output file written when none is configured
pub const DEFAULT_OUTPUT: &str = "covered_calls.csv";

/// Full configuration for one screening run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Tickers to fetch, processed in this order
    pub tickers: Vec<String>,
    /// CSV output path (overwritten)
    pub output: PathBuf,
    /// HTTP response cache
    pub cache: CacheConfig,
    /// Candidate predicate thresholds
    pub filter: FilterConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            cache: CacheConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl ScreenConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> ScreenerResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: ScreenConfig = serde_json::from_str(&json)
            .map_err(|e| ScreenerError::config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScreenerResult<()> {
        if let Some(blank) = self.tickers.iter().position(|t| t.trim().is_empty()) {
            return Err(ScreenerError::config(format!("ticker #{} is blank", blank + 1)));
        }

        if self.cache.max_age_days < 0 {
            return Err(ScreenerError::config(format!(
                "cache max_age_days must be >= 0, got {}",
                self.cache.max_age_days
            )));
        }

        if self.output.as_os_str().is_empty() {
            return Err(ScreenerError::config("output path is empty"));
        }

        Ok(())
    }
}

/// Covered call candidate thresholds
///
/// A row qualifies when its type matches, it is not expired, it is out of
/// the money, and every threshold below holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Chain side to keep
    pub option_type: OptionType,
    /// Minimum days until expiration (inclusive)
    pub min_days: i64,
    /// Volume must be strictly greater than this
    pub volume_above: u64,
    /// Open interest must be strictly greater than this
    pub open_interest_above: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            option_type: OptionType::Call,
            min_days: 14,
            volume_above: 1,
            open_interest_above: 10,
        }
    }
}

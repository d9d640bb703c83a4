//! # Covered Calls - Option Chain Screener
//!
//! Screens equity option chains for covered call candidates and writes the
//! ranked result to a CSV file.
//!
//! ## Overview
//!
//! For each configured ticker the full option chain (every expiration,
//! every strike, calls and puts) is fetched from Yahoo Finance through a
//! local response cache. Each contract is enriched with premium, insurance
//! and max-profit ratios against a single as-of date, the tickers are
//! combined into one table, and the out-of-the-money liquid calls are
//! ranked and exported.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use covered_calls::prelude::*;
//! use chrono::Local;
//!
//! let config = ScreenConfig::default();
//! let client = YahooClient::new(config.cache.clone()).unwrap();
//!
//! let screener = Screener::new(client, config);
//! let report = screener.run(Local::now().date_naive()).unwrap();
//! println!("{} candidates written to {:?}", report.stats.selected, report.output);
//! ```
//!
//! ## What This Tool Does NOT Do
//!
//! - Price options (no Black-Scholes, no Greeks)
//! - Track snapshots over time
//! - Retry failed fetches: the first error ends the run

pub mod core;
pub mod data;
pub mod screen;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::core::{OptionRow, OptionType, ScreenerError, ScreenerResult};

    pub use crate::data::{
        CacheConfig, CachedTransport, DataCache, OptionChainSource, YahooClient,
    };

    pub use crate::screen::{
        enrich, enrich_row, rank, render_csv, select_candidates, write_csv, EnrichedOption,
        FilterConfig, ScreenConfig, ScreenReport, Screener, SelectionStats, EXPORT_COLUMNS,
        SORT_COLUMNS,
    };
}

// Re-export main types at crate root
pub use crate::core::{ScreenerError, ScreenerResult};
pub use crate::screen::{ScreenConfig, Screener};

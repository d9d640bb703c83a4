//! Screener - Main facade for the screening pipeline
//!
//! Fetches each ticker in order, enriches it against one as-of date, and
//! accumulates a single combined table; then selects, ranks and writes
//! the candidates once.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::ScreenerResult;
use crate::data::OptionChainSource;

use super::{enrich, rank, select_candidates, write_csv, EnrichedOption, ScreenConfig, SelectionStats};

/// Summary of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenReport {
    /// As-of date used for every row
    pub as_of: NaiveDate,
    /// Tickers processed, in order
    pub tickers: Vec<String>,
    /// Rows in the combined table
    pub total_rows: usize,
    /// Selection counts
    pub stats: SelectionStats,
    /// File written
    pub output: PathBuf,
}

/// Runs the full pipeline against an option chain source
pub struct Screener<S> {
    source: S,
    config: ScreenConfig,
}

impl<S: OptionChainSource> Screener<S> {
    pub fn new(source: S, config: ScreenConfig) -> Self {
        Self { source, config }
    }

    /// Get current configuration
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Build the combined enriched table.
    ///
    /// Rows keep ticker order, then source order within a ticker. The first
    /// fetch error aborts the whole collection.
    pub fn collect(&self, today: NaiveDate) -> ScreenerResult<Vec<EnrichedOption>> {
        let mut combined = Vec::new();

        for ticker in &self.config.tickers {
            tracing::info!("Fetching option chain for {}", ticker);
            let rows = self.source.fetch_chain(ticker)?;
            tracing::info!("{}: {} contracts", ticker, rows.len());

            combined.extend(enrich(rows, today));
        }

        Ok(combined)
    }

    /// Select and rank candidates from a combined table
    pub fn screen(&self, combined: Vec<EnrichedOption>) -> (Vec<EnrichedOption>, SelectionStats) {
        let (mut candidates, stats) = select_candidates(combined, &self.config.filter);

        if stats.rejected_non_finite > 0 {
            tracing::warn!(
                "Excluded {} candidates with non-finite ranking values",
                stats.rejected_non_finite
            );
        }

        rank(&mut candidates);
        (candidates, stats)
    }

    /// Full run: collect, screen, write the CSV.
    ///
    /// Nothing is written unless every ticker was fetched.
    pub fn run(&self, today: NaiveDate) -> ScreenerResult<ScreenReport> {
        let combined = self.collect(today)?;
        let total_rows = combined.len();

        let (candidates, stats) = self.screen(combined);
        tracing::info!(
            "{} of {} contracts qualify as covered call candidates",
            stats.selected,
            total_rows
        );

        write_csv(&self.config.output, &candidates)?;

        Ok(ScreenReport {
            as_of: today,
            tickers: self.config.tickers.clone(),
            total_rows,
            stats,
            output: self.config.output.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OptionRow, OptionType, ScreenerError};
    use crate::screen::EXPORT_COLUMNS;
    use chrono::Duration;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    /// In-memory source that records the order tickers were requested in
    struct StaticSource {
        chains: HashMap<String, Vec<OptionRow>>,
        requested: RefCell<Vec<String>>,
    }

    impl StaticSource {
        fn new(chains: Vec<(&str, Vec<OptionRow>)>) -> Self {
            Self {
                chains: chains.into_iter().map(|(t, rows)| (t.to_string(), rows)).collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl OptionChainSource for StaticSource {
        fn fetch_chain(&self, ticker: &str) -> ScreenerResult<Vec<OptionRow>> {
            self.requested.borrow_mut().push(ticker.to_string());
            self.chains
                .get(ticker)
                .cloned()
                .ok_or_else(|| ScreenerError::network(format!("no route to {}", ticker)))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn call(root: &str, symbol: &str, days: i64, strike: f64, bid: f64, vol: u64) -> OptionRow {
        OptionRow::new(
            root,
            symbol,
            OptionType::Call,
            today() + Duration::days(days),
            strike,
            100.0,
            bid,
        )
        .with_liquidity(vol, 20)
    }

    fn config(dir: &std::path::Path, tickers: &[&str]) -> ScreenConfig {
        ScreenConfig {
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            output: dir.join("covered_calls.csv"),
            ..Default::default()
        }
    }

    fn body_lines(path: &std::path::Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_single_qualifying_contract() {
        let dir = tempdir().unwrap();
        let source = StaticSource::new(vec![(
            "TEST",
            vec![
                call("TEST", "TEST240331C00110000", 30, 110.0, 2.0, 5),
                call("TEST", "TEST240331C00111000", 30, 111.0, 2.0, 1),
                call("TEST", "TEST240229C00110000", -1, 110.0, 2.0, 5),
            ],
        )]);

        let screener = Screener::new(&source, config(dir.path(), &["TEST"]));
        let report = screener.run(today()).unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.stats.selected, 1);

        let lines = body_lines(&report.output);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("24.33,2.00,"));
        assert!(lines[0].contains(",TEST240331C00110000,"));
    }

    #[test]
    fn test_combined_table_keeps_ticker_order_and_duplicates() {
        let dir = tempdir().unwrap();
        let shared = call("SPY", "SPY240412C00105000", 42, 105.0, 1.0, 3);
        let source = StaticSource::new(vec![
            ("SPY", vec![shared.clone()]),
            ("QQQ", vec![call("QQQ", "QQQ240412C00104000", 42, 104.0, 1.0, 3)]),
            ("SPX", vec![shared]),
        ]);

        let screener = Screener::new(&source, config(dir.path(), &["SPY", "QQQ", "SPX"]));
        let combined = screener.collect(today()).unwrap();

        let symbols: Vec<&str> = combined.iter().map(|e| e.row.symbol.as_str()).collect();
        assert_eq!(
            symbols,
            vec!["SPY240412C00105000", "QQQ240412C00104000", "SPY240412C00105000"]
        );
        assert_eq!(*source.requested.borrow(), vec!["SPY", "QQQ", "SPX"]);
    }

    #[test]
    fn test_output_sorted_descending() {
        let dir = tempdir().unwrap();
        let source = StaticSource::new(vec![
            (
                "AAA",
                vec![
                    call("AAA", "AAA1", 30, 105.0, 0.5, 9),
                    call("AAA", "AAA2", 20, 108.0, 1.8, 9),
                ],
            ),
            (
                "BBB",
                vec![
                    call("BBB", "BBB1", 90, 120.0, 4.0, 9),
                    call("BBB", "BBB2", 15, 102.0, 0.9, 9),
                ],
            ),
        ]);

        let report = Screener::new(&source, config(dir.path(), &["AAA", "BBB"]))
            .run(today())
            .unwrap();

        let keys: Vec<f64> = body_lines(&report.output)
            .iter()
            .map(|line| line.split(',').next().unwrap().parse().unwrap())
            .collect();

        assert_eq!(keys.len(), 4);
        for pair in keys.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_empty_ticker_list_writes_header() {
        let dir = tempdir().unwrap();
        let source = StaticSource::new(vec![]);

        let report = Screener::new(&source, config(dir.path(), &[])).run(today()).unwrap();

        let csv = fs::read_to_string(&report.output).unwrap();
        assert_eq!(csv, format!("{}\n", EXPORT_COLUMNS.join(",")));
        assert_eq!(report.stats.selected, 0);
    }

    #[test]
    fn test_everything_filtered_writes_header() {
        let dir = tempdir().unwrap();
        let mut put = call("AAA", "AAA240331P00110000", 30, 110.0, 2.0, 5);
        put.option_type = OptionType::Put;

        let source = StaticSource::new(vec![
            (
                "AAA",
                vec![
                    put,
                    call("AAA", "AAA240331C00090000", 30, 90.0, 12.0, 5),
                    call("AAA", "AAA240310C00110000", 9, 110.0, 0.5, 5),
                ],
            ),
            (
                "BBB",
                vec![
                    call("BBB", "BBB240331C00110000", 30, 110.0, 2.0, 1),
                    call("BBB", "BBB240229C00110000", -1, 110.0, 2.0, 5),
                ],
            ),
        ]);

        let report = Screener::new(&source, config(dir.path(), &["AAA", "BBB"]))
            .run(today())
            .unwrap();

        assert_eq!(report.total_rows, 5);
        assert_eq!(report.stats.selected, 0);

        let csv = fs::read_to_string(&report.output).unwrap();
        assert_eq!(csv, format!("{}\n", EXPORT_COLUMNS.join(",")));
    }

    #[test]
    fn test_fetch_failure_aborts_without_output() {
        let dir = tempdir().unwrap();
        let source = StaticSource::new(vec![(
            "AAPL",
            vec![call("AAPL", "AAPL240331C00110000", 30, 110.0, 2.0, 5)],
        )]);

        let screener = Screener::new(&source, config(dir.path(), &["AAPL", "MISSING", "MSFT"]));
        let err = screener.run(today()).unwrap_err();

        assert!(matches!(err, ScreenerError::Network(_)));
        assert!(!dir.path().join("covered_calls.csv").exists());
        // Nothing after the failing ticker is requested
        assert_eq!(*source.requested.borrow(), vec!["AAPL", "MISSING"]);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempdir().unwrap();
        let source = StaticSource::new(vec![(
            "TEST",
            vec![
                call("TEST", "T1", 30, 110.0, 2.0, 5),
                call("TEST", "T2", 45, 115.0, 2.5, 5),
                call("TEST", "T3", 30, 112.0, 2.0, 5),
            ],
        )]);

        let screener = Screener::new(&source, config(dir.path(), &["TEST"]));
        let first = fs::read(screener.run(today()).unwrap().output).unwrap();
        let second = fs::read(screener.run(today()).unwrap().output).unwrap();

        assert_eq!(first, second);
    }
}

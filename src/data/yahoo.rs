//! Yahoo Finance data fetcher
//!
//! Fetches the full option chain (every expiration, every strike, calls and
//! puts) for a ticker from Yahoo Finance's unofficial v7 options API.
//!
//! Note: This is for personal research purposes. Yahoo Finance data is
//! delayed ~15 minutes and intended for personal use.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::cache::{CacheConfig, CachedTransport};
use super::source::OptionChainSource;
use crate::core::{parse_root, OptionRow, OptionType, ScreenerError, ScreenerResult};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance";

/// Yahoo Finance API client
pub struct YahooClient {
    transport: CachedTransport,
    base_url: String,
}

impl YahooClient {
    pub fn new(cache: CacheConfig) -> ScreenerResult<Self> {
        Ok(Self {
            transport: CachedTransport::new(cache)?,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another endpoint (mirrors, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn fetch_page(&self, symbol: &str, expiration: Option<i64>) -> ScreenerResult<ChainPage> {
        let (key, url) = match expiration {
            Some(ts) => (
                format!("{}_options_{}", symbol, ts),
                format!("{}/options/{}?date={}", self.base_url, symbol, ts),
            ),
            None => (
                format!("{}_options", symbol),
                format!("{}/options/{}", self.base_url, symbol),
            ),
        };

        let body = self.transport.get_text(&key, &url)?;
        parse_options_response(&body, symbol, expiration)
    }

    /// Get available option expirations as Unix timestamps
    pub fn get_expirations(&self, symbol: &str) -> ScreenerResult<Vec<i64>> {
        Ok(self.fetch_page(symbol, None)?.expirations)
    }

    /// Get option rows (calls and puts) for one expiration
    pub fn get_option_chain(&self, symbol: &str, expiration: i64) -> ScreenerResult<Vec<OptionRow>> {
        Ok(self.fetch_page(symbol, Some(expiration))?.rows)
    }

    /// Get the full option chain (all expirations)
    pub fn get_all_rows(&self, symbol: &str) -> ScreenerResult<Vec<OptionRow>> {
        let expirations = self.get_expirations(symbol)?;
        tracing::info!("{}: {} expirations", symbol, expirations.len());

        let mut rows = Vec::new();
        for expiration in expirations {
            rows.extend(self.get_option_chain(symbol, expiration)?);
        }

        Ok(rows)
    }
}

impl OptionChainSource for YahooClient {
    fn fetch_chain(&self, ticker: &str) -> ScreenerResult<Vec<OptionRow>> {
        self.get_all_rows(ticker)
    }
}

/// One decoded options response
#[derive(Debug, Clone)]
pub struct ChainPage {
    pub expirations: Vec<i64>,
    pub rows: Vec<OptionRow>,
}

/// Decode a v7 options response body into rows.
///
/// `requested` is the expiration the request asked for; contracts without
/// their own `expiration` field fall back to it.
pub fn parse_options_response(
    body: &str,
    ticker: &str,
    requested: Option<i64>,
) -> ScreenerResult<ChainPage> {
    let response: YahooOptionsResponse = serde_json::from_str(body)
        .map_err(|e| ScreenerError::data(format!("Failed to parse options for {}: {}", ticker, e)))?;

    if let Some(err) = response.option_chain.error {
        return Err(ScreenerError::data(format!("{}: {}", ticker, err)));
    }

    let chain = response
        .option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| ScreenerError::data(format!("No options data returned for {}", ticker)))?;

    let underlying_price = chain
        .quote
        .regular_market_price
        .ok_or_else(|| ScreenerError::data(format!("No underlying price for {}", ticker)))?;

    let mut rows = Vec::new();
    for options in &chain.options {
        for (side, contracts) in [(OptionType::Call, &options.calls), (OptionType::Put, &options.puts)] {
            for data in contracts {
                if let Some(row) = convert_option_row(data, ticker, side, underlying_price, requested) {
                    rows.push(row);
                }
            }
        }
    }

    Ok(ChainPage {
        expirations: chain.expiration_dates,
        rows,
    })
}

fn timestamp_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

/// Convert Yahoo option data to a raw row
fn convert_option_row(
    data: &YahooOptionData,
    ticker: &str,
    option_type: OptionType,
    underlying_price: f64,
    requested: Option<i64>,
) -> Option<OptionRow> {
    let strike = data.strike?;
    let symbol = data.contract_symbol.clone()?;
    let expiry = data.expiration.or(requested).and_then(timestamp_to_date)?;

    let root = parse_root(&symbol).unwrap_or(ticker).to_string();

    Some(OptionRow {
        root,
        symbol,
        option_type,
        expiry,
        strike,
        underlying_price,
        bid: data.bid.unwrap_or(0.0),
        ask: data.ask,
        last: data.last_price,
        volume: data.volume.map(|v| v.max(0) as u64).unwrap_or(0),
        open_interest: data.open_interest.map(|oi| oi.max(0) as u64).unwrap_or(0),
        implied_vol: data.implied_volatility,
    })
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    #[serde(default)]
    result: Vec<YahooOptionChainData>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    quote: YahooQuoteData,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    expiration: Option<i64>,
    bid: Option<f64>,
    ask: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

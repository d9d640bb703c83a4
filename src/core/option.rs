//! Option contract rows
//!
//! Represents one option-chain record (one contract, one fetch) as delivered
//! by the data source, before any derived columns are computed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ScreenerError;

/// Length of the OCC suffix: YYMMDD + C/P + 8-digit strike
const OCC_SUFFIX_LEN: usize = 15;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    #[serde(rename = "calls", alias = "call")]
    Call,
    #[serde(rename = "puts", alias = "put")]
    Put,
}

impl OptionType {
    /// Chain side label as it appears in the `Type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "calls",
            OptionType::Put => "puts",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "calls" | "call" | "c" => Ok(OptionType::Call),
            "puts" | "put" | "p" => Ok(OptionType::Put),
            other => Err(ScreenerError::invalid_input(format!(
                "unknown option type: {}",
                other
            ))),
        }
    }
}

/// One raw option-chain row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRow {
    /// Underlying root symbol (e.g., "AAPL")
    pub root: String,
    /// Contract symbol (e.g., "AAPL240119C00150000")
    pub symbol: String,
    /// Chain side
    pub option_type: OptionType,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Strike price
    pub strike: f64,
    /// Underlying spot at fetch time
    pub underlying_price: f64,
    /// Bid price (0.0 when the provider reports none)
    pub bid: f64,
    /// Ask price
    pub ask: Option<f64>,
    /// Last traded price
    pub last: Option<f64>,
    /// Traded volume
    pub volume: u64,
    /// Open interest
    pub open_interest: u64,
    /// Implied volatility as reported by the provider
    pub implied_vol: Option<f64>,
}

impl OptionRow {
    /// Create a row with no ask/last/IV and zero liquidity
    pub fn new(
        root: impl Into<String>,
        symbol: impl Into<String>,
        option_type: OptionType,
        expiry: NaiveDate,
        strike: f64,
        underlying_price: f64,
        bid: f64,
    ) -> Self {
        Self {
            root: root.into(),
            symbol: symbol.into(),
            option_type,
            expiry,
            strike,
            underlying_price,
            bid,
            ask: None,
            last: None,
            volume: 0,
            open_interest: 0,
            implied_vol: None,
        }
    }

    /// Builder-style liquidity setter
    pub fn with_liquidity(mut self, volume: u64, open_interest: u64) -> Self {
        self.volume = volume;
        self.open_interest = open_interest;
        self
    }

    /// Builder-style implied volatility setter
    pub fn with_implied_vol(mut self, iv: f64) -> Self {
        self.implied_vol = Some(iv);
        self
    }

    /// Is this option out of the money?
    pub fn is_otm(&self) -> bool {
        match self.option_type {
            OptionType::Call => self.strike > self.underlying_price,
            OptionType::Put => self.strike < self.underlying_price,
        }
    }
}

/// Extract the root from an OCC-style contract symbol.
///
/// Returns `None` when the symbol is not `ROOT + YYMMDD + C|P + 8 digits`.
pub fn parse_root(symbol: &str) -> Option<&str> {
    if !symbol.is_ascii() || symbol.len() <= OCC_SUFFIX_LEN {
        return None;
    }

    let (root, suffix) = symbol.split_at(symbol.len() - OCC_SUFFIX_LEN);
    let bytes = suffix.as_bytes();

    let date_ok = bytes[..6].iter().all(u8::is_ascii_digit);
    let side_ok = matches!(bytes[6], b'C' | b'P');
    let strike_ok = bytes[7..].iter().all(u8::is_ascii_digit);

    if date_ok && side_ok && strike_ok {
        Some(root)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type_labels() {
        assert_eq!(OptionType::Call.to_string(), "calls");
        assert_eq!(OptionType::Put.as_str(), "puts");

        assert_eq!("calls".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!("PUT".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!("straddle".parse::<OptionType>().is_err());
    }

    #[test]
    fn test_serde_uses_chain_labels() {
        assert_eq!(serde_json::to_string(&OptionType::Call).unwrap(), r#""calls""#);
        assert_eq!(serde_json::to_string(&OptionType::Put).unwrap(), r#""puts""#);

        let parsed: Vec<OptionType> = serde_json::from_str(r#"["calls", "puts", "call", "put"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![OptionType::Call, OptionType::Put, OptionType::Call, OptionType::Put]
        );
    }

    #[test]
    fn test_parse_root() {
        assert_eq!(parse_root("AAPL240119C00150000"), Some("AAPL"));
        assert_eq!(parse_root("SPY240621P00400000"), Some("SPY"));
        // Adjusted contracts carry a digit in the root
        assert_eq!(parse_root("AAPL1240119C00150000"), Some("AAPL1"));

        assert_eq!(parse_root("240119C00150000"), None);
        assert_eq!(parse_root("AAPL240119X00150000"), None);
        assert_eq!(parse_root("AAPL"), None);
    }

    #[test]
    fn test_moneyness() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let call = OptionRow::new("QQQ", "QQQ250620C00510000", OptionType::Call, expiry, 510.0, 500.0, 3.0);
        let put = OptionRow::new("QQQ", "QQQ250620P00510000", OptionType::Put, expiry, 510.0, 500.0, 12.0);

        assert!(call.is_otm());
        assert!(!put.is_otm());
    }
}

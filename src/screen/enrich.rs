//! Row enrichment: derived covered call metrics
//!
//! Every derived field is a function of the row's own raw fields and a
//! single as-of date. Percentages are `100 * ratio`; annualized values
//! scale by `365 / days until expiration`.
//!
//! Divisions are plain IEEE `f64`: an expiry of exactly `today` or a zero
//! underlying price yields infinities or NaN, which the candidate filter
//! rejects before ranking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::OptionRow;

const DAYS_PER_YEAR: f64 = 365.0;

/// An option row with its derived columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOption {
    /// Raw row as fetched
    pub row: OptionRow,
    /// `xDaysUntilExpiration`: whole days from the as-of date, may be <= 0
    pub days_until_expiration: i64,
    /// `xExpired`
    pub expired: bool,
    /// `xInsurance%`: downside covered by the premium
    pub insurance_pct: f64,
    /// `xProfitCur`: premium collected now
    pub profit_cur: f64,
    /// `xProfitCur%`
    pub profit_cur_pct: f64,
    /// `xProfitCurAnnual%`
    pub profit_cur_annual_pct: f64,
    /// `xProfitMax`: premium plus upside to the strike
    pub profit_max: f64,
    /// `xProfitMax%`
    pub profit_max_pct: f64,
    /// `xProfitMaxAnnual%`
    pub profit_max_annual_pct: f64,
    /// `xPriceLossAt`: underlying price where the position breaks even
    pub price_loss_at: f64,
}

impl EnrichedOption {
    /// Ranking key, in priority order
    pub fn ranking_key(&self) -> [f64; 3] {
        [
            self.profit_cur_annual_pct,
            self.insurance_pct,
            self.profit_max_annual_pct,
        ]
    }

    /// All ranking fields are finite
    pub fn has_finite_ranking(&self) -> bool {
        self.ranking_key().iter().all(|v| v.is_finite())
    }
}

/// Derive the metric columns for one row
pub fn enrich_row(row: OptionRow, today: NaiveDate) -> EnrichedOption {
    let days = (row.expiry - today).num_days();
    let expired = days <= 0;

    let bid = row.bid;
    let spot = row.underlying_price;

    let insurance_pct = 100.0 * bid / spot;
    let profit_cur = bid;
    let profit_cur_pct = 100.0 * bid / spot;
    let profit_cur_annual_pct = profit_cur_pct * DAYS_PER_YEAR / days as f64;
    let profit_max = bid + row.strike - spot;
    let profit_max_pct = 100.0 * profit_max / spot;
    let profit_max_annual_pct = profit_max_pct * DAYS_PER_YEAR / days as f64;
    let price_loss_at = spot - bid;

    EnrichedOption {
        row,
        days_until_expiration: days,
        expired,
        insurance_pct,
        profit_cur,
        profit_cur_pct,
        profit_cur_annual_pct,
        profit_max,
        profit_max_pct,
        profit_max_annual_pct,
        price_loss_at,
    }
}

/// Enrich a ticker's raw rows against one as-of date
pub fn enrich(rows: Vec<OptionRow>, today: NaiveDate) -> Vec<EnrichedOption> {
    rows.into_iter().map(|row| enrich_row(row, today)).collect()
}

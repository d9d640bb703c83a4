//! CSV export of ranked candidates

use std::fs;
use std::path::Path;

use crate::core::{ScreenerError, ScreenerResult};

use super::EnrichedOption;

/// Exported columns, in output order
pub const EXPORT_COLUMNS: [&str; 14] = [
    "xProfitCurAnnual%",
    "xInsurance%",
    "xProfitMaxAnnual%",
    "xDaysUntilExpiration",
    "Root",
    "Underlying_Price",
    "Strike",
    "Type",
    "Expiry",
    "Symbol",
    "Bid",
    "Vol",
    "Open_Int",
    "IV",
];

/// Ranking columns, highest priority first (all descending)
pub const SORT_COLUMNS: [&str; 3] = ["xProfitCurAnnual%", "xInsurance%", "xProfitMaxAnnual%"];

fn money(v: f64) -> String {
    format!("{:.2}", v)
}

fn export_record(option: &EnrichedOption) -> [String; 14] {
    let row = &option.row;

    [
        money(option.profit_cur_annual_pct),
        money(option.insurance_pct),
        money(option.profit_max_annual_pct),
        option.days_until_expiration.to_string(),
        row.root.clone(),
        money(row.underlying_price),
        money(row.strike),
        row.option_type.to_string(),
        row.expiry.format("%Y-%m-%d").to_string(),
        row.symbol.clone(),
        money(row.bid),
        row.volume.to_string(),
        row.open_interest.to_string(),
        row.implied_vol.map(money).unwrap_or_default(),
    ]
}

/// Render rows as CSV with a header line; an empty slice yields the header only
pub fn render_csv(rows: &[EnrichedOption]) -> ScreenerResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    wtr.write_record(EXPORT_COLUMNS)?;
    for option in rows {
        wtr.write_record(export_record(option))?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ScreenerError::Csv(format!("failed to flush CSV writer: {}", e)))?;
    String::from_utf8(data).map_err(|e| ScreenerError::Csv(format!("CSV output is not valid UTF-8: {}", e)))
}

/// Render in memory, then write `path` in one call (overwriting it)
pub fn write_csv(path: impl AsRef<Path>, rows: &[EnrichedOption]) -> ScreenerResult<()> {
    let path = path.as_ref();
    let csv = render_csv(rows)?;
    fs::write(path, csv)?;

    tracing::info!("Wrote {} candidates to {}", rows.len(), path.display());
    Ok(())
}

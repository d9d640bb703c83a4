//! Covered call screening
//!
//! Sells a call against shares already held: the premium is kept now
//! (current profit, and a cushion against a drop in the underlying), and
//! the upside is capped at the strike (max profit).
//!
//! Pipeline:
//! 1. **Enrichment**: derive days to expiry, premium and max-profit ratios per row
//! 2. **Selection**: out-of-the-money, liquid, not-too-near calls with finite metrics
//! 3. **Ranking**: annualized premium, then insurance, then annualized max profit
//! 4. **Export**: fixed column projection to CSV

mod config;
mod enrich;
mod export;
mod filter;
mod pipeline;

pub use config::*;
pub use enrich::*;
pub use export::*;
pub use filter::*;
pub use pipeline::*;

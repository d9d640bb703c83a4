//! Option chain source abstraction

use crate::core::{OptionRow, ScreenerResult};

/// Anything that can deliver a ticker's full raw option chain
pub trait OptionChainSource {
    /// Fetch every contract (all expirations, all strikes, calls and puts)
    fn fetch_chain(&self, ticker: &str) -> ScreenerResult<Vec<OptionRow>>;
}

impl<S: OptionChainSource + ?Sized> OptionChainSource for &S {
    fn fetch_chain(&self, ticker: &str) -> ScreenerResult<Vec<OptionRow>> {
        (**self).fetch_chain(ticker)
    }
}

//! Market data access port trait.

use crate::domain::error::AscentiaError;
use crate::domain::fundamentals::FundamentalsSnapshot;
use crate::domain::price_series::PriceSeries;
use crate::domain::ticker::{Lookback, Ticker};

pub trait MarketDataPort {
    /// Fails with `DataUnavailable` when the provider does not know the ticker.
    fn get_fundamentals(&self, ticker: &Ticker) -> Result<FundamentalsSnapshot, AscentiaError>;

    /// Daily history ending today. An empty history is reported as
    /// `DataUnavailable`, never as an empty series.
    fn get_price_history(
        &self,
        ticker: &Ticker,
        lookback: Lookback,
    ) -> Result<PriceSeries, AscentiaError>;

    fn provider_name(&self) -> &'static str;
}

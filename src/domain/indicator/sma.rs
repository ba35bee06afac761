//! Simple moving averages of closing prices.
//!
//! SMA(n)[i] = sum(C[i-n+1..=i]) / n. The crossover compares the latest
//! short and long averages; it needs at least `long` closes.

use super::{Shortfall, latest_mean};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossover {
    pub short: f64,
    pub long: f64,
}

impl Crossover {
    /// Short average strictly above the long one.
    pub fn is_bullish(&self) -> bool {
        self.short > self.long
    }
}

pub fn latest_sma(closes: &[f64], period: usize) -> Result<f64, Shortfall> {
    latest_mean(closes, period)
}

pub fn ma_crossover(closes: &[f64], short: usize, long: usize) -> Result<Crossover, Shortfall> {
    Shortfall::check(closes.len(), short.max(long))?;
    Ok(Crossover {
        short: latest_sma(closes, short)?,
        long: latest_sma(closes, long)?,
    })
}

//! RSI (Relative Strength Index).
//!
//! Average gain and loss are plain means of the last n close-to-close
//! changes (no exponential smoothing):
//!
//! RS  = avg_gain / (avg_loss + EPSILON)
//! RSI = 100 - 100 / (1 + RS)
//!
//! Needs n + 1 closes to produce n changes.

use super::{EPSILON, Shortfall, rolling_mean};

pub const DEFAULT_PERIOD: usize = 14;

pub fn latest_rsi(closes: &[f64], period: usize) -> Result<f64, Shortfall> {
    let period = period.max(1);
    Shortfall::check(closes.len(), period + 1)?;

    let mut gains: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let avg_gain = rolling_mean(&gains, period)
        .last()
        .copied()
        .flatten()
        .ok_or(Shortfall {
            have: closes.len(),
            need: period + 1,
        })?;
    let avg_loss = rolling_mean(&losses, period)
        .last()
        .copied()
        .flatten()
        .ok_or(Shortfall {
            have: closes.len(),
            need: period + 1,
        })?;

    let rs = avg_gain / (avg_loss + EPSILON);
    Ok(100.0 - 100.0 / (1.0 + rs))
}

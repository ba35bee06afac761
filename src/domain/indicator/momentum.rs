//! Percentage change from the first to the last close.

use super::Shortfall;

/// Trading days in a year; shorter histories are not treated as a full year.
pub const ONE_YEAR_POINTS: usize = 252;

/// (C[last] - C[0]) / C[0] * 100, requiring at least `min_points` closes.
pub fn pct_change(closes: &[f64], min_points: usize) -> Result<f64, Shortfall> {
    Shortfall::check(closes.len(), min_points.max(2))?;
    let first = closes[0];
    let last = closes[closes.len() - 1];
    Ok((last - first) / first * 100.0)
}

//! Technical indicator calculations over close and volume histories.
//!
//! Every calculation reads the most recent value of a trailing window. When
//! the history is shorter than the window the calculation returns a
//! [`Shortfall`] instead of a number, and the caller decides what to score.
//!
//! - `sma`: simple moving averages and the 50/200 crossover
//! - `rsi`: relative strength index with simple rolling means
//! - `volume`: latest volume against its trailing average
//! - `momentum`: first-to-last percentage price change

pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod volume;

use std::fmt;

/// Guards divisions whose denominator can legitimately be zero
/// (flat volume, no losing days).
pub const EPSILON: f64 = 1e-9;

/// History too short for the requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub have: usize,
    pub need: usize,
}

impl Shortfall {
    pub fn check(have: usize, need: usize) -> Result<(), Shortfall> {
        if have < need {
            Err(Shortfall { have, need })
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insufficient data (have {}, need {})", self.have, self.need)
    }
}

/// Trailing mean at each position, `None` until `period` values are available.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(Some(sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Mean of the last `period` values.
pub fn latest_mean(values: &[f64], period: usize) -> Result<f64, Shortfall> {
    Shortfall::check(values.len(), period.max(1))?;
    let window = &values[values.len() - period.max(1)..];
    Ok(window.iter().sum::<f64>() / window.len() as f64)
}

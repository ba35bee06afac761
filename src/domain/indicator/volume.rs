//! Volume trend: latest session volume against its trailing average.
//!
//! ratio = V[last] / (SMA(V, n)[last] + EPSILON)

use super::{EPSILON, Shortfall, latest_mean};

pub const DEFAULT_PERIOD: usize = 30;

pub fn volume_ratio(volumes: &[f64], period: usize) -> Result<f64, Shortfall> {
    let average = latest_mean(volumes, period)?;
    let latest = volumes[volumes.len() - 1];
    Ok(latest / (average + EPSILON))
}

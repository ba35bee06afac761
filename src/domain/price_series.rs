//! Daily close/volume history for a single ticker.

use chrono::NaiveDate;

use crate::domain::error::AscentiaError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64, volume: i64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

/// Bars in strictly ascending date order. Closes are finite and positive.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, AscentiaError> {
        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(AscentiaError::InvalidSeries {
                    reason: format!("close {} on {} is not a positive price", bar.close, bar.date),
                });
            }
            if bar.volume < 0 {
                return Err(AscentiaError::InvalidSeries {
                    reason: format!("negative volume on {}", bar.date),
                });
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(AscentiaError::InvalidSeries {
                    reason: format!("{} does not follow {}", bar.date, bars[i - 1].date),
                });
            }
        }
        Ok(Self { bars })
    }

    /// Sorts by date and keeps the last bar seen for any repeated date.
    pub fn from_unsorted(mut bars: Vec<PriceBar>) -> Result<Self, AscentiaError> {
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self::new(deduped)
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.last().map(|b| b.close)
    }
}

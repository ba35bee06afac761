//! Ticker symbols and history lookback windows.

use chrono::{Months, NaiveDate};
use std::fmt;

use crate::domain::error::AscentiaError;

pub const MAX_TICKER_LEN: usize = 20;

/// Upper-cased exchange symbol such as `BHP.AX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticker(String);

impl Ticker {
    /// Trims and upper-cases `input`. When the symbol has no exchange suffix
    /// and `default_suffix` is given, the suffix is appended.
    pub fn parse(input: &str, default_suffix: Option<&str>) -> Result<Self, AscentiaError> {
        let invalid = |reason: &str| AscentiaError::InvalidTicker {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(invalid("empty symbol"));
        }
        if let Some(suffix) = default_suffix.map(str::trim).filter(|s| !s.is_empty()) {
            if !symbol.contains('.') && !symbol.starts_with('^') {
                let suffix = suffix.to_uppercase();
                if !suffix.starts_with('.') {
                    symbol.push('.');
                }
                symbol.push_str(&suffix);
            }
        }
        if symbol.len() > MAX_TICKER_LEN {
            return Err(invalid("symbol too long"));
        }
        if !symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
        {
            return Err(invalid("unexpected character"));
        }
        if symbol.starts_with('.') || symbol.ends_with('.') {
            return Err(invalid("misplaced exchange suffix"));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How much history to request from a market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Months(u32),
    Years(u32),
}

impl Default for Lookback {
    fn default() -> Self {
        Lookback::Years(1)
    }
}

impl Lookback {
    /// First calendar day inside the window ending on `end`.
    pub fn start_date(&self, end: NaiveDate) -> NaiveDate {
        let months = match *self {
            Lookback::Months(m) => m,
            Lookback::Years(y) => y.saturating_mul(12),
        };
        end.checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Range token in the `1y` / `6mo` form used by chart APIs.
    pub fn as_range(&self) -> String {
        match *self {
            Lookback::Months(m) => format!("{m}mo"),
            Lookback::Years(y) => format!("{y}y"),
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_range())
    }
}

//! Fundamental metrics supplied by the market-data provider.
//!
//! Providers disagree on whether yield and return on equity are quoted as a
//! fraction (0.045) or a percentage (4.5). Both are normalized on the way in
//! so the scoring engine only ever sees fractions:
//! a value below 1 is already a fraction, anything else is a percentage and
//! is divided by 100.

/// Canonicalize a ratio that may be quoted as a fraction or a percentage.
pub fn normalize_ratio(value: f64) -> f64 {
    if value < 1.0 { value } else { value / 100.0 }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalsSnapshot {
    pub name: String,
    pub trailing_pe: Option<f64>,
    /// Fraction, e.g. 0.045 for 4.5%.
    pub dividend_yield: Option<f64>,
    /// Fraction, e.g. 0.18 for 18%.
    pub return_on_equity: Option<f64>,
    /// Ratio as quoted by the provider, e.g. 45.0.
    pub debt_to_equity: Option<f64>,
}

impl FundamentalsSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_trailing_pe(mut self, pe: Option<f64>) -> Self {
        self.trailing_pe = finite(pe);
        self
    }

    /// Accepts either representation; stored as a fraction.
    pub fn with_dividend_yield(mut self, value: Option<f64>) -> Self {
        self.dividend_yield = finite(value).map(normalize_ratio);
        self
    }

    /// Accepts either representation; stored as a fraction.
    pub fn with_return_on_equity(mut self, value: Option<f64>) -> Self {
        self.return_on_equity = finite(value).map(normalize_ratio);
        self
    }

    pub fn with_debt_to_equity(mut self, de: Option<f64>) -> Self {
        self.debt_to_equity = finite(de);
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "N/A"
        } else {
            &self.name
        }
    }
}

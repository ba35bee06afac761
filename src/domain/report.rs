//! Score reports and the recommendation derived from them.

use std::fmt;

use crate::domain::scoring::{IndicatorResult, MAX_INDICATOR_SCORE};

pub const STRONG_BUY_THRESHOLD: u8 = 75;
pub const NEUTRAL_THRESHOLD: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    StrongBuy,
    Neutral,
    Avoid,
}

impl Recommendation {
    pub fn from_score(final_score: u8) -> Self {
        if final_score >= STRONG_BUY_THRESHOLD {
            Recommendation::StrongBuy
        } else if final_score >= NEUTRAL_THRESHOLD {
            Recommendation::Neutral
        } else {
            Recommendation::Avoid
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Neutral => "NEUTRAL",
            Recommendation::Avoid => "AVOID",
        }
    }

    /// Class name used by the web templates.
    pub fn css_class(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "strong-buy",
            Recommendation::Neutral => "neutral",
            Recommendation::Avoid => "avoid",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub ticker: String,
    pub name: String,
    pub last_price: f64,
    pub indicators: Vec<IndicatorResult>,
    pub final_score: u8,
    pub recommendation: Recommendation,
}

impl ScoreReport {
    pub fn summary_line(&self) -> String {
        format!(
            "Last Price: ${:.2} | Investment Score: {}/100 | Recommendation: {}",
            self.last_price, self.final_score, self.recommendation
        )
    }

    /// Plain-text rendering: header, summary, then one line per indicator.
    pub fn render_text(&self) -> String {
        let mut out = format!("{} - {}\n", self.ticker, self.name);
        out.push_str(&self.summary_line());
        out.push_str("\n\nIndicator Breakdown\n");
        for ind in &self.indicators {
            out.push_str(&format!(
                "{}: {}/{} → {}\n",
                ind.name(),
                ind.score,
                MAX_INDICATOR_SCORE,
                ind.reason
            ));
        }
        out
    }
}

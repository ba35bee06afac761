//! Ten-indicator investment scoring.
//!
//! Each indicator maps one input to a score in 1..=9 plus a short reason.
//! Missing fundamentals and histories too short for an indicator's window
//! both score a neutral 5; only an empty price series fails the report,
//! because there is no last price to show.
//!
//! final_score = round(sum(scores) / 90 * 100)

use std::fmt;

use crate::domain::error::AscentiaError;
use crate::domain::fundamentals::FundamentalsSnapshot;
use crate::domain::indicator::momentum::{ONE_YEAR_POINTS, pct_change};
use crate::domain::indicator::rsi::{self, latest_rsi};
use crate::domain::indicator::sma::ma_crossover;
use crate::domain::indicator::volume::{self, volume_ratio};
use crate::domain::price_series::PriceSeries;
use crate::domain::report::{Recommendation, ScoreReport};
use crate::domain::ticker::Ticker;

pub const MIN_INDICATOR_SCORE: u8 = 1;
pub const MAX_INDICATOR_SCORE: u8 = 9;
pub const NEUTRAL_SCORE: u8 = 5;
pub const INDICATOR_COUNT: usize = 10;
pub const MAX_TOTAL_SCORE: u32 = MAX_INDICATOR_SCORE as u32 * INDICATOR_COUNT as u32;

pub const MA_SHORT_PERIOD: usize = 50;
pub const MA_LONG_PERIOD: usize = 200;

/// `(bound, score)` pairs checked in order; the first bound the value
/// clears wins, otherwise the floor applies.
type Tiers = [(f64, u8)];

const PE_TIERS: [(f64, u8); 4] = [(10.0, 9), (15.0, 7), (20.0, 5), (30.0, 3)];
const PE_FLOOR: u8 = 1;
const GROWTH_TIERS: [(f64, u8); 4] = [(50.0, 9), (20.0, 7), (0.0, 5), (-20.0, 3)];
const GROWTH_FLOOR: u8 = 1;
const ROE_PCT_TIERS: [(f64, u8); 3] = [(20.0, 9), (10.0, 7), (5.0, 4)];
const ROE_FLOOR: u8 = 2;
const DE_TIERS: [(f64, u8); 3] = [(20.0, 9), (50.0, 7), (100.0, 4)];
const DE_FLOOR: u8 = 1;
const YIELD_PCT_TIERS: [(f64, u8); 3] = [(5.0, 9), (3.0, 7), (1.5, 5)];
const YIELD_FLOOR: u8 = 2;
const RSI_TIERS: [(f64, u8); 4] = [(30.0, 9), (45.0, 7), (55.0, 5), (70.0, 3)];
const RSI_FLOOR: u8 = 1;
const VOLUME_TIERS: [(f64, u8); 2] = [(1.5, 8), (0.7, 5)];
const VOLUME_FLOOR: u8 = 2;
const MA_BULLISH: u8 = 8;
const MA_BEARISH: u8 = 2;

fn score_below(value: f64, tiers: &Tiers, floor: u8) -> u8 {
    tiers
        .iter()
        .find(|(bound, _)| value < *bound)
        .map_or(floor, |(_, score)| *score)
}

fn score_above(value: f64, tiers: &Tiers, floor: u8) -> u8 {
    tiers
        .iter()
        .find(|(bound, _)| value > *bound)
        .map_or(floor, |(_, score)| *score)
}

/// The ten indicators, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    PriceEarnings,
    EarningsGrowth,
    ReturnOnEquity,
    DebtToEquity,
    DividendYield,
    MaCrossover,
    Rsi,
    VolumeTrend,
    Momentum,
    AnalystRec,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; INDICATOR_COUNT] = [
        IndicatorKind::PriceEarnings,
        IndicatorKind::EarningsGrowth,
        IndicatorKind::ReturnOnEquity,
        IndicatorKind::DebtToEquity,
        IndicatorKind::DividendYield,
        IndicatorKind::MaCrossover,
        IndicatorKind::Rsi,
        IndicatorKind::VolumeTrend,
        IndicatorKind::Momentum,
        IndicatorKind::AnalystRec,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::PriceEarnings => "P/E",
            IndicatorKind::EarningsGrowth => "Earnings Growth",
            IndicatorKind::ReturnOnEquity => "ROE",
            IndicatorKind::DebtToEquity => "Debt/Equity",
            IndicatorKind::DividendYield => "Dividend Yield",
            IndicatorKind::MaCrossover => "MA50/MA200",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::VolumeTrend => "Volume Trend",
            IndicatorKind::Momentum => "12m Momentum",
            IndicatorKind::AnalystRec => "Analyst Rec",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorResult {
    pub kind: IndicatorKind,
    pub score: u8,
    pub reason: String,
}

impl IndicatorResult {
    pub fn new(kind: IndicatorKind, score: u8, reason: impl Into<String>) -> Self {
        debug_assert!(
            (MIN_INDICATOR_SCORE..=MAX_INDICATOR_SCORE).contains(&score),
            "{kind} score {score} out of range"
        );
        Self {
            kind,
            score: score.clamp(MIN_INDICATOR_SCORE, MAX_INDICATOR_SCORE),
            reason: reason.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

pub fn score_pe(trailing_pe: Option<f64>) -> IndicatorResult {
    let kind = IndicatorKind::PriceEarnings;
    match trailing_pe {
        Some(pe) => IndicatorResult::new(
            kind,
            score_below(pe, &PE_TIERS, PE_FLOOR),
            format!("P/E={pe:?}"),
        ),
        None => IndicatorResult::new(kind, NEUTRAL_SCORE, "P/E=N/A"),
    }
}

/// One-year price change stands in for earnings growth.
pub fn score_earnings_growth(closes: &[f64]) -> IndicatorResult {
    let (pct, score) = one_year_change(closes);
    IndicatorResult::new(
        IndicatorKind::EarningsGrowth,
        score,
        format!("Price change ≈ {pct:.1}%"),
    )
}

/// `roe` is a fraction; thresholds are in percent.
pub fn score_roe(roe: Option<f64>) -> IndicatorResult {
    let kind = IndicatorKind::ReturnOnEquity;
    match roe {
        Some(fraction) => {
            let pct = fraction * 100.0;
            IndicatorResult::new(
                kind,
                score_above(pct, &ROE_PCT_TIERS, ROE_FLOOR),
                format!("{pct:.1}%"),
            )
        }
        None => IndicatorResult::new(kind, NEUTRAL_SCORE, "N/A"),
    }
}

pub fn score_debt_to_equity(de: Option<f64>) -> IndicatorResult {
    let kind = IndicatorKind::DebtToEquity;
    match de {
        Some(de) => IndicatorResult::new(
            kind,
            score_below(de, &DE_TIERS, DE_FLOOR),
            format!("{de:?}"),
        ),
        None => IndicatorResult::new(kind, NEUTRAL_SCORE, "N/A"),
    }
}

/// `dividend_yield` is a fraction; thresholds are in percent.
pub fn score_dividend_yield(dividend_yield: Option<f64>) -> IndicatorResult {
    let kind = IndicatorKind::DividendYield;
    match dividend_yield {
        Some(fraction) => {
            let pct = fraction * 100.0;
            IndicatorResult::new(
                kind,
                score_above(pct, &YIELD_PCT_TIERS, YIELD_FLOOR),
                format!("{pct:.2}%"),
            )
        }
        None => IndicatorResult::new(kind, NEUTRAL_SCORE, "N/A"),
    }
}

pub fn score_ma_crossover(closes: &[f64]) -> IndicatorResult {
    let kind = IndicatorKind::MaCrossover;
    match ma_crossover(closes, MA_SHORT_PERIOD, MA_LONG_PERIOD) {
        Ok(c) => {
            let score = if c.is_bullish() { MA_BULLISH } else { MA_BEARISH };
            IndicatorResult::new(kind, score, format!("{:.2} vs {:.2}", c.short, c.long))
        }
        Err(shortfall) => IndicatorResult::new(kind, NEUTRAL_SCORE, shortfall.to_string()),
    }
}

pub fn score_rsi(closes: &[f64]) -> IndicatorResult {
    let kind = IndicatorKind::Rsi;
    match latest_rsi(closes, rsi::DEFAULT_PERIOD) {
        Ok(value) => IndicatorResult::new(
            kind,
            score_below(value, &RSI_TIERS, RSI_FLOOR),
            format!("{value:.1}"),
        ),
        Err(shortfall) => IndicatorResult::new(kind, NEUTRAL_SCORE, shortfall.to_string()),
    }
}

pub fn score_volume_trend(volumes: &[f64]) -> IndicatorResult {
    let kind = IndicatorKind::VolumeTrend;
    match volume_ratio(volumes, volume::DEFAULT_PERIOD) {
        Ok(ratio) => IndicatorResult::new(
            kind,
            score_above(ratio, &VOLUME_TIERS, VOLUME_FLOOR),
            format!("{ratio:.2}"),
        ),
        Err(shortfall) => IndicatorResult::new(kind, NEUTRAL_SCORE, shortfall.to_string()),
    }
}

pub fn score_momentum(closes: &[f64]) -> IndicatorResult {
    let (pct, score) = one_year_change(closes);
    IndicatorResult::new(IndicatorKind::Momentum, score, format!("{pct:.1}%"))
}

/// No analyst data source is wired in.
pub fn score_analyst_rec() -> IndicatorResult {
    IndicatorResult::new(IndicatorKind::AnalystRec, NEUTRAL_SCORE, "Neutral fallback")
}

/// Under a year of history counts as 0% change with a neutral score.
fn one_year_change(closes: &[f64]) -> (f64, u8) {
    match pct_change(closes, ONE_YEAR_POINTS) {
        Ok(pct) => (pct, score_above(pct, &GROWTH_TIERS, GROWTH_FLOOR)),
        Err(_) => (0.0, NEUTRAL_SCORE),
    }
}

/// All ten indicators in display order.
pub fn score_indicators(
    fundamentals: &FundamentalsSnapshot,
    series: &PriceSeries,
) -> Vec<IndicatorResult> {
    let closes = series.closes();
    let volumes = series.volumes();

    vec![
        score_pe(fundamentals.trailing_pe),
        score_earnings_growth(&closes),
        score_roe(fundamentals.return_on_equity),
        score_debt_to_equity(fundamentals.debt_to_equity),
        score_dividend_yield(fundamentals.dividend_yield),
        score_ma_crossover(&closes),
        score_rsi(&closes),
        score_volume_trend(&volumes),
        score_momentum(&closes),
        score_analyst_rec(),
    ]
}

/// round(sum / 90 * 100), capped at 100.
pub fn final_score(indicators: &[IndicatorResult]) -> u8 {
    let total: u32 = indicators.iter().map(|r| u32::from(r.score)).sum();
    let pct = (f64::from(total) / f64::from(MAX_TOTAL_SCORE) * 100.0).round();
    pct.min(100.0) as u8
}

pub fn compute_report(
    ticker: &Ticker,
    fundamentals: &FundamentalsSnapshot,
    series: &PriceSeries,
) -> Result<ScoreReport, AscentiaError> {
    let last_price = series
        .last_close()
        .ok_or_else(|| AscentiaError::InsufficientData {
            ticker: ticker.to_string(),
            points: 0,
            minimum: 1,
        })?;

    let indicators = score_indicators(fundamentals, series);
    let final_score = final_score(&indicators);

    Ok(ScoreReport {
        ticker: ticker.to_string(),
        name: fundamentals.display_name().to_string(),
        last_price,
        indicators,
        final_score,
        recommendation: Recommendation::from_score(final_score),
    })
}

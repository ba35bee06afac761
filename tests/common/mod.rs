#![allow(dead_code)]

use ascentia::domain::error::AscentiaError;
use ascentia::domain::fundamentals::FundamentalsSnapshot;
pub use ascentia::domain::price_series::{PriceBar, PriceSeries};
use ascentia::domain::ticker::{Lookback, Ticker};
use ascentia::domain::watchlist::{WatchlistEntry, entries_for};
use ascentia::ports::config_port::ConfigPort;
use ascentia::ports::market_data_port::MarketDataPort;
use ascentia::ports::watchlist_port::WatchlistPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct MockMarketDataPort {
    pub fundamentals: HashMap<String, FundamentalsSnapshot>,
    pub series: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            fundamentals: HashMap::new(),
            series: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_ticker(
        mut self,
        ticker: &str,
        fundamentals: FundamentalsSnapshot,
        series: PriceSeries,
    ) -> Self {
        self.fundamentals.insert(ticker.to_string(), fundamentals);
        self.series.insert(ticker.to_string(), series);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    fn check(&self, ticker: &Ticker) -> Result<(), AscentiaError> {
        match self.errors.get(ticker.as_str()) {
            Some(reason) => Err(AscentiaError::data_unavailable(ticker.as_str(), reason)),
            None => Ok(()),
        }
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn get_fundamentals(&self, ticker: &Ticker) -> Result<FundamentalsSnapshot, AscentiaError> {
        self.check(ticker)?;
        self.fundamentals
            .get(ticker.as_str())
            .cloned()
            .ok_or_else(|| AscentiaError::data_unavailable(ticker.as_str(), "unknown ticker"))
    }

    fn get_price_history(
        &self,
        ticker: &Ticker,
        _lookback: Lookback,
    ) -> Result<PriceSeries, AscentiaError> {
        self.check(ticker)?;
        match self.series.get(ticker.as_str()) {
            Some(series) if !series.is_empty() => Ok(series.clone()),
            Some(_) => Err(AscentiaError::data_unavailable(
                ticker.as_str(),
                "price history is empty",
            )),
            None => Err(AscentiaError::data_unavailable(ticker.as_str(), "unknown ticker")),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Default)]
pub struct InMemoryWatchlist {
    rows: Mutex<Vec<WatchlistEntry>>,
}

impl InMemoryWatchlist {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WatchlistPort for InMemoryWatchlist {
    fn append(&self, entry: &WatchlistEntry) -> Result<(), AscentiaError> {
        self.rows.lock().unwrap().push(entry.clone());
        Ok(())
    }

    fn list_for(&self, username: &str) -> Result<Vec<WatchlistEntry>, AscentiaError> {
        Ok(entries_for(self.rows.lock().unwrap().iter(), username))
    }
}

/// Store whose every call fails, for degraded-mode tests.
pub struct FailingWatchlist;

impl WatchlistPort for FailingWatchlist {
    fn append(&self, _entry: &WatchlistEntry) -> Result<(), AscentiaError> {
        Err(AscentiaError::store_unavailable("connection refused"))
    }

    fn list_for(&self, _username: &str) -> Result<Vec<WatchlistEntry>, AscentiaError> {
        Err(AscentiaError::store_unavailable("connection refused"))
    }
}

/// `(section, key) -> value` config for tests that do not need a file.
#[derive(Default, Clone)]
pub struct MapConfig {
    values: HashMap<(String, String), String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        self.values
            .insert((section.to_string(), key.to_string()), value.to_string());
        self
    }
}

impl ConfigPort for MapConfig {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily bars from `start`, closing on each value of `closes`.
pub fn series_from_closes(start: &str, closes: &[f64], volume: i64) -> PriceSeries {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, close)| PriceBar::new(start + chrono::Days::new(i as u64), *close, volume))
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// Straight line from `first` to `last` over `count` bars.
pub fn linear_series(first: f64, last: f64, count: usize) -> PriceSeries {
    let step = if count > 1 {
        (last - first) / (count - 1) as f64
    } else {
        0.0
    };
    let closes: Vec<f64> = (0..count).map(|i| first + step * i as f64).collect();
    series_from_closes("2023-01-02", &closes, 1_000_000)
}

pub fn strong_fundamentals(name: &str) -> FundamentalsSnapshot {
    FundamentalsSnapshot::new(name)
        .with_trailing_pe(Some(9.5))
        .with_dividend_yield(Some(0.055))
        .with_return_on_equity(Some(0.25))
        .with_debt_to_equity(Some(15.0))
}

pub fn bhp_market() -> MockMarketDataPort {
    MockMarketDataPort::new()
        .with_ticker(
            "BHP.AX",
            strong_fundamentals("BHP Group Limited"),
            linear_series(100.0, 160.0, 260),
        )
        .with_error("DOWN.AX", "provider timeout")
}

/// Writes `<TICKER>.csv` and `fundamentals.csv` for the CSV provider.
pub fn write_csv_fixture(dir: &std::path::Path, ticker: &str, series: &PriceSeries) {
    let mut prices = String::from("date,close,volume\n");
    for bar in series.bars() {
        prices.push_str(&format!(
            "{},{},{}\n",
            bar.date.format("%Y-%m-%d"),
            bar.close,
            bar.volume
        ));
    }
    std::fs::write(dir.join(format!("{ticker}.csv")), prices).unwrap();
    std::fs::write(
        dir.join("fundamentals.csv"),
        format!(
            "ticker,name,trailing_pe,dividend_yield,return_on_equity,debt_to_equity\n\
             {ticker},Fixture Co,9.5,0.055,25,15\n"
        ),
    )
    .unwrap();
}

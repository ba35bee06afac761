//! CSV directory market data adapter.
//!
//! Layout under the base directory:
//! - `<TICKER>.csv`: `date,close,volume`, one row per trading day
//! - `fundamentals.csv`: `ticker,name,trailing_pe,dividend_yield,return_on_equity,debt_to_equity`
//!
//! Empty fundamentals cells are treated as absent. The lookback window is
//! measured back from the newest row in the file, so stored snapshots keep
//! working after they age.

use crate::domain::error::AscentiaError;
use crate::domain::fundamentals::FundamentalsSnapshot;
use crate::domain::price_series::{PriceBar, PriceSeries};
use crate::domain::ticker::{Lookback, Ticker};
use crate::domain::watchlist::DATE_FORMAT;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const FUNDAMENTALS_FILE: &str = "fundamentals.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &Ticker) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read(&self, path: &Path, ticker: &Ticker) -> Result<String, AscentiaError> {
        fs::read_to_string(path).map_err(|e| {
            AscentiaError::data_unavailable(
                ticker.as_str(),
                format!("failed to read {}: {}", path.display(), e),
            )
        })
    }
}

fn column<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    ticker: &Ticker,
) -> Result<&'r str, AscentiaError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| {
            AscentiaError::data_unavailable(ticker.as_str(), format!("missing {name} column"))
        })
}

fn optional_number(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    ticker: &Ticker,
) -> Result<Option<f64>, AscentiaError> {
    match record.get(idx).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|e| {
            AscentiaError::data_unavailable(ticker.as_str(), format!("invalid {name} value: {e}"))
        }),
    }
}

impl MarketDataPort for CsvAdapter {
    fn get_fundamentals(&self, ticker: &Ticker) -> Result<FundamentalsSnapshot, AscentiaError> {
        let path = self.base_path.join(FUNDAMENTALS_FILE);
        let content = self.read(&path, ticker)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        for result in rdr.records() {
            let record = result.map_err(|e| {
                AscentiaError::data_unavailable(ticker.as_str(), format!("CSV parse error: {e}"))
            })?;

            if !column(&record, 0, "ticker", ticker)?.eq_ignore_ascii_case(ticker.as_str()) {
                continue;
            }

            let name = record.get(1).map(str::trim).unwrap_or_default();
            return Ok(FundamentalsSnapshot::new(name)
                .with_trailing_pe(optional_number(&record, 2, "trailing_pe", ticker)?)
                .with_dividend_yield(optional_number(&record, 3, "dividend_yield", ticker)?)
                .with_return_on_equity(optional_number(&record, 4, "return_on_equity", ticker)?)
                .with_debt_to_equity(optional_number(&record, 5, "debt_to_equity", ticker)?));
        }

        Err(AscentiaError::data_unavailable(
            ticker.as_str(),
            format!("no row in {}", path.display()),
        ))
    }

    fn get_price_history(
        &self,
        ticker: &Ticker,
        lookback: Lookback,
    ) -> Result<PriceSeries, AscentiaError> {
        let path = self.csv_path(ticker);
        let content = self.read(&path, ticker)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| {
                AscentiaError::data_unavailable(ticker.as_str(), format!("CSV parse error: {e}"))
            })?;

            let date_str = column(&record, 0, "date", ticker)?;
            let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|e| {
                AscentiaError::data_unavailable(ticker.as_str(), format!("invalid date format: {e}"))
            })?;

            let close: f64 = column(&record, 1, "close", ticker)?.parse().map_err(|e| {
                AscentiaError::data_unavailable(ticker.as_str(), format!("invalid close value: {e}"))
            })?;

            let volume: i64 = column(&record, 2, "volume", ticker)?.parse().map_err(|e| {
                AscentiaError::data_unavailable(ticker.as_str(), format!("invalid volume value: {e}"))
            })?;

            bars.push(PriceBar::new(date, close, volume));
        }

        let Some(newest) = bars.iter().map(|b| b.date).max() else {
            return Err(AscentiaError::data_unavailable(
                ticker.as_str(),
                "price history is empty",
            ));
        };
        let start = lookback.start_date(newest);
        bars.retain(|b| b.date > start);

        PriceSeries::from_unsorted(bars)
    }

    fn provider_name(&self) -> &'static str {
        "csv"
    }
}

//! Process-scoped application context.
//!
//! Built once at startup from the INI config and shared by the CLI and the
//! web server. Holds the market data provider, the optional watchlist store
//! and the analysis defaults.

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::domain::error::AscentiaError;
use crate::domain::report::ScoreReport;
use crate::domain::scoring::compute_report;
use crate::domain::ticker::{Lookback, Ticker};
use crate::domain::watchlist::WatchlistEntry;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::watchlist_port::WatchlistPort;

pub type SharedMarketData = Arc<dyn MarketDataPort + Send + Sync>;
pub type SharedWatchlist = Arc<dyn WatchlistPort + Send + Sync>;

pub const DEFAULT_LOOKBACK_YEARS: i64 = 1;

pub struct AppContext {
    market_data: SharedMarketData,
    watchlist: Option<SharedWatchlist>,
    lookback: Lookback,
    default_suffix: Option<String>,
}

impl AppContext {
    pub fn new(market_data: SharedMarketData, watchlist: Option<SharedWatchlist>) -> Self {
        Self {
            market_data,
            watchlist,
            lookback: Lookback::default(),
            default_suffix: None,
        }
    }

    pub fn with_lookback(mut self, lookback: Lookback) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_default_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.default_suffix = (!suffix.trim().is_empty()).then(|| suffix.trim().to_string());
        self
    }

    /// Builds the provider from `[market_data]`, the store from `[watchlist]`
    /// and the analysis defaults from `[analysis]`. A store that cannot be
    /// opened leaves the watchlist disabled instead of failing startup.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, AscentiaError> {
        let market_data = market_data_from_config(config)?;

        let years = config.get_int("analysis", "lookback_years", DEFAULT_LOOKBACK_YEARS);
        if years < 1 {
            return Err(AscentiaError::ConfigInvalid {
                section: "analysis".into(),
                key: "lookback_years".into(),
                reason: format!("must be at least 1, got {years}"),
            });
        }

        let mut ctx = Self::new(market_data, watchlist_from_config(config))
            .with_lookback(Lookback::Years(years as u32));
        if let Some(suffix) = config.get_string("analysis", "default_suffix") {
            ctx = ctx.with_default_suffix(suffix);
        }

        tracing::info!(
            provider = ctx.market_data.provider_name(),
            lookback = %ctx.lookback,
            watchlist = ctx.watchlist_enabled(),
            "application context ready"
        );
        Ok(ctx)
    }

    pub fn provider_name(&self) -> &'static str {
        self.market_data.provider_name()
    }

    pub fn watchlist_enabled(&self) -> bool {
        self.watchlist.is_some()
    }

    pub fn parse_ticker(&self, input: &str) -> Result<Ticker, AscentiaError> {
        Ticker::parse(input, self.default_suffix.as_deref())
    }

    /// Fetches fundamentals and price history for `input` and scores them.
    pub fn analyze(&self, input: &str) -> Result<ScoreReport, AscentiaError> {
        let ticker = self.parse_ticker(input)?;
        tracing::info!(%ticker, provider = self.provider_name(), "analysis started");

        let series = self
            .market_data
            .get_price_history(&ticker, self.lookback)
            .inspect_err(|e| tracing::warn!(%ticker, error = %e, "price history unavailable"))?;
        let fundamentals = self
            .market_data
            .get_fundamentals(&ticker)
            .inspect_err(|e| tracing::warn!(%ticker, error = %e, "fundamentals unavailable"))?;

        let report = compute_report(&ticker, &fundamentals, &series)?;
        tracing::info!(
            %ticker,
            points = series.len(),
            score = report.final_score,
            recommendation = %report.recommendation,
            "analysis finished"
        );
        Ok(report)
    }

    fn store(&self) -> Result<&SharedWatchlist, AscentiaError> {
        self.watchlist
            .as_ref()
            .ok_or_else(|| AscentiaError::store_unavailable("watchlist is disabled"))
    }

    /// Appends `input` to `username`'s watchlist, dated today.
    pub fn add_to_watchlist(
        &self,
        username: &str,
        input: &str,
    ) -> Result<WatchlistEntry, AscentiaError> {
        let ticker = self.parse_ticker(input)?;
        let entry = WatchlistEntry::today(username, &ticker);
        self.store()?
            .append(&entry)
            .inspect_err(|e| tracing::error!(username, error = %e, "watchlist append failed"))?;
        tracing::info!(username, %ticker, "added to watchlist");
        Ok(entry)
    }

    pub fn watchlist_for(&self, username: &str) -> Result<Vec<WatchlistEntry>, AscentiaError> {
        self.store()?.list_for(username)
    }
}

/// Provider selected by `[market_data] provider` (`yahoo` by default).
pub fn market_data_from_config(config: &dyn ConfigPort) -> Result<SharedMarketData, AscentiaError> {
    let provider = config
        .get_string("market_data", "provider")
        .map(|p| p.trim().to_lowercase())
        .unwrap_or_else(|| "yahoo".to_string());

    match provider.as_str() {
        "csv" => {
            let dir = config.get_string("market_data", "csv_dir").ok_or_else(|| {
                AscentiaError::ConfigMissing {
                    section: "market_data".into(),
                    key: "csv_dir".into(),
                }
            })?;
            Ok(Arc::new(CsvAdapter::new(PathBuf::from(dir))))
        }
        #[cfg(feature = "yahoo")]
        "yahoo" => Ok(Arc::new(
            crate::adapters::yahoo_adapter::YahooAdapter::from_config(config),
        )),
        other => Err(AscentiaError::ConfigInvalid {
            section: "market_data".into(),
            key: "provider".into(),
            reason: format!("unsupported provider {other:?}"),
        }),
    }
}

#[cfg(feature = "sqlite")]
fn watchlist_from_config(config: &dyn ConfigPort) -> Option<SharedWatchlist> {
    use crate::adapters::sqlite_adapter::SqliteWatchlistAdapter;

    match SqliteWatchlistAdapter::from_config(config) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::error!(error = %e, "watchlist store unavailable, watchlist disabled");
            None
        }
    }
}

#[cfg(not(feature = "sqlite"))]
fn watchlist_from_config(_config: &dyn ConfigPort) -> Option<SharedWatchlist> {
    tracing::warn!("built without sqlite, watchlist disabled");
    None
}

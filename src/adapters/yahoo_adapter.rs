//! Yahoo Finance HTTP market data adapter.
//!
//! Prices come from the v8 chart endpoint, fundamentals from the v10
//! quoteSummary endpoint (`price`, `summaryDetail`, `financialData`
//! modules). quoteSummary wants a session cookie plus a crumb token, so
//! each fundamentals lookup performs the cookie/crumb handshake first.
//!
//! The client is blocking. It is built per call so that it is created and
//! dropped on the calling thread, which in the web adapter is a
//! `spawn_blocking` worker rather than an async task.

use chrono::{DateTime, Duration as ChronoDuration};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::error::AscentiaError;
use crate::domain::fundamentals::FundamentalsSnapshot;
use crate::domain::price_series::{PriceBar, PriceSeries};
use crate::domain::ticker::{Lookback, Ticker};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_SECS: f64 = 20.0;
const MAX_TIMEOUT_SECS: f64 = 300.0;
const COOKIE_SEED_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) ascentia/0.1";
const SUMMARY_MODULES: &str = "price,summaryDetail,financialData";

pub struct YahooAdapter {
    base_url: String,
    timeout: Duration,
}

impl YahooAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let base_url = config
            .get_string("market_data", "base_url")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = config.get_double("market_data", "timeout_secs", DEFAULT_TIMEOUT_SECS);
        let timeout_secs = if timeout_secs.is_finite() {
            timeout_secs.clamp(1.0, MAX_TIMEOUT_SECS)
        } else {
            DEFAULT_TIMEOUT_SECS
        };
        Self::new(base_url, Duration::from_secs_f64(timeout_secs))
    }

    fn client(&self, ticker: &Ticker) -> Result<Client, AscentiaError> {
        Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                AscentiaError::data_unavailable(
                    ticker.as_str(),
                    format!("failed to build http client: {e}"),
                )
            })
    }

    /// Seeds the cookie jar and fetches a crumb. `None` when Yahoo refuses;
    /// the request is still attempted without one.
    fn crumb(&self, client: &Client) -> Option<String> {
        if let Err(e) = client.get(COOKIE_SEED_URL).send() {
            tracing::debug!(error = %e, "cookie seed request failed");
        }
        let res = client
            .get(format!("{}/v1/test/getcrumb", self.base_url))
            .send()
            .ok()?;
        if !res.status().is_success() {
            tracing::debug!(status = %res.status(), "crumb request rejected");
            return None;
        }
        res.text()
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn get_text(
        &self,
        request: reqwest::blocking::RequestBuilder,
        ticker: &Ticker,
    ) -> Result<String, AscentiaError> {
        let res = request.send().map_err(|e| {
            AscentiaError::data_unavailable(ticker.as_str(), format!("request failed: {e}"))
        })?;
        let status = res.status();
        let body = res.text().map_err(|e| {
            AscentiaError::data_unavailable(ticker.as_str(), format!("failed to read response: {e}"))
        })?;

        // Yahoo reports unknown symbols as 404 with a JSON error body; let
        // the parser surface that message.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(body)
        } else {
            Err(AscentiaError::data_unavailable(
                ticker.as_str(),
                format!("provider HTTP {status}"),
            ))
        }
    }
}

impl MarketDataPort for YahooAdapter {
    fn get_fundamentals(&self, ticker: &Ticker) -> Result<FundamentalsSnapshot, AscentiaError> {
        let client = self.client(ticker)?;
        let crumb = self.crumb(&client);

        let mut request = client
            .get(format!(
                "{}/v10/finance/quoteSummary/{}",
                self.base_url, ticker
            ))
            .query(&[("modules", SUMMARY_MODULES)]);
        if let Some(crumb) = &crumb {
            request = request.query(&[("crumb", crumb.as_str())]);
        }

        let body = self.get_text(request, ticker)?;
        parse_quote_summary(ticker, &body)
    }

    fn get_price_history(
        &self,
        ticker: &Ticker,
        lookback: Lookback,
    ) -> Result<PriceSeries, AscentiaError> {
        let client = self.client(ticker)?;
        let request = client
            .get(format!("{}/v8/finance/chart/{}", self.base_url, ticker))
            .query(&[
                ("range", lookback.as_range()),
                ("interval", "1d".to_string()),
                ("includePrePost", "false".to_string()),
            ]);

        let body = self.get_text(request, ticker)?;
        parse_chart(ticker, &body)
    }

    fn provider_name(&self) -> &'static str {
        "yahoo"
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl ApiError {
    fn into_domain(self, ticker: &Ticker) -> AscentiaError {
        let reason = match self.description {
            Some(d) if !d.is_empty() => format!("{}: {}", self.code, d),
            _ => self.code,
        };
        AscentiaError::data_unavailable(ticker.as_str(), reason)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

/// Parses a v8 chart response. Sessions with a null close are skipped and
/// a null volume counts as zero.
pub fn parse_chart(ticker: &Ticker, body: &str) -> Result<PriceSeries, AscentiaError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| {
        AscentiaError::data_unavailable(ticker.as_str(), format!("malformed chart response: {e}"))
    })?;

    if let Some(err) = envelope.chart.error {
        return Err(err.into_domain(ticker));
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AscentiaError::data_unavailable(ticker.as_str(), "no chart result"))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = ChronoDuration::seconds(result.meta.gmtoffset);

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);
        let Some(utc) = DateTime::from_timestamp(*ts, 0) else {
            continue;
        };
        bars.push(PriceBar::new((utc + offset).date_naive(), close, volume));
    }

    if bars.is_empty() {
        return Err(AscentiaError::data_unavailable(
            ticker.as_str(),
            "price history is empty",
        ));
    }

    PriceSeries::from_unsorted(bars)
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    financial_data: Option<FinancialData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default, rename = "trailingPE")]
    trailing_pe: Option<RawNumber>,
    #[serde(default)]
    dividend_yield: Option<RawNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    #[serde(default)]
    return_on_equity: Option<RawNumber>,
    #[serde(default)]
    debt_to_equity: Option<RawNumber>,
}

/// `{"raw": 12.3, "fmt": "12.30"}`, or `{}` when Yahoo has no value.
#[derive(Debug, Deserialize)]
struct RawNumber {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: Option<&RawNumber>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

/// Parses a v10 quoteSummary response into a normalized snapshot.
pub fn parse_quote_summary(
    ticker: &Ticker,
    body: &str,
) -> Result<FundamentalsSnapshot, AscentiaError> {
    let envelope: SummaryEnvelope = serde_json::from_str(body).map_err(|e| {
        AscentiaError::data_unavailable(ticker.as_str(), format!("malformed summary response: {e}"))
    })?;

    if let Some(err) = envelope.quote_summary.error {
        return Err(err.into_domain(ticker));
    }

    let result = envelope
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AscentiaError::data_unavailable(ticker.as_str(), "no summary result"))?;

    let name = result
        .price
        .and_then(|p| p.long_name.or(p.short_name))
        .unwrap_or_default();
    let detail = result.summary_detail.as_ref();
    let financial = result.financial_data.as_ref();

    Ok(FundamentalsSnapshot::new(name)
        .with_trailing_pe(raw(detail.and_then(|d| d.trailing_pe.as_ref())))
        .with_dividend_yield(raw(detail.and_then(|d| d.dividend_yield.as_ref())))
        .with_return_on_equity(raw(financial.and_then(|f| f.return_on_equity.as_ref())))
        .with_debt_to_equity(raw(financial.and_then(|f| f.debt_to_equity.as_ref()))))
}

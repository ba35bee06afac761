//! HTML templates using Askama.
//!
//! Every page is a fragment template. HTMX requests receive the fragment on
//! its own; ordinary requests get it wrapped in [`BasePage`].

use askama::Template;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};

use crate::domain::report::ScoreReport;
use crate::domain::scoring::MAX_INDICATOR_SCORE;
use crate::domain::watchlist::WatchlistEntry;

use super::{WebError, is_htmx_request};

#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage<'a> {
    pub title: &'a str,
    pub user: Option<&'a str>,
    pub content: &'a str,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub error: Option<&'a str>,
    pub username: &'a str,
    pub next: &'a str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub display_name: &'a str,
    pub provider: &'a str,
    pub entries: &'a [WatchlistEntry],
    pub enabled: bool,
    pub message: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate<'a> {
    pub report: &'a ScoreReport,
    pub max_score: u8,
    pub watchlist_enabled: bool,
}

impl<'a> ReportTemplate<'a> {
    pub fn new(report: &'a ScoreReport, watchlist_enabled: bool) -> Self {
        Self {
            report,
            max_score: MAX_INDICATOR_SCORE,
            watchlist_enabled,
        }
    }
}

#[derive(Template)]
#[template(path = "watchlist.html")]
pub struct WatchlistTemplate<'a> {
    pub entries: &'a [WatchlistEntry],
    pub enabled: bool,
    pub message: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

/// Fragment for HTMX, full page otherwise.
pub fn render_page<T: Template>(
    headers: &HeaderMap,
    title: &str,
    user: Option<&str>,
    fragment: &T,
) -> Result<Response, WebError> {
    let content = fragment
        .render()
        .map_err(|e| WebError::internal(format!("template error: {e}")))?;

    if is_htmx_request(headers) {
        return Ok(Html(content).into_response());
    }

    let page = BasePage {
        title,
        user,
        content: &content,
    }
    .render()
    .map_err(|e| WebError::internal(format!("template error: {e}")))?;
    Ok(Html(page).into_response())
}

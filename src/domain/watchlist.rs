//! Watchlist rows (one per "add to watchlist" action).

use chrono::NaiveDate;

use crate::domain::ticker::Ticker;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub username: String,
    pub ticker: String,
    pub date_added: NaiveDate,
}

impl WatchlistEntry {
    pub fn new(username: impl Into<String>, ticker: &Ticker, date_added: NaiveDate) -> Self {
        Self {
            username: username.into(),
            ticker: ticker.to_string(),
            date_added,
        }
    }

    /// Stamped with the local calendar date.
    pub fn today(username: impl Into<String>, ticker: &Ticker) -> Self {
        Self::new(username, ticker, chrono::Local::now().date_naive())
    }

    pub fn date_added_iso(&self) -> String {
        self.date_added.format(DATE_FORMAT).to_string()
    }
}

/// Keep only `username`'s rows, preserving order.
pub fn entries_for<'a>(
    entries: impl IntoIterator<Item = &'a WatchlistEntry>,
    username: &str,
) -> Vec<WatchlistEntry> {
    entries
        .into_iter()
        .filter(|e| e.username == username)
        .cloned()
        .collect()
}

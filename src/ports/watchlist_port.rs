//! Watchlist persistence port trait.

use crate::domain::error::AscentiaError;
use crate::domain::watchlist::WatchlistEntry;

/// Append-only row store keyed by username.
pub trait WatchlistPort {
    fn append(&self, entry: &WatchlistEntry) -> Result<(), AscentiaError>;

    /// `username`'s rows in the order they were appended.
    fn list_for(&self, username: &str) -> Result<Vec<WatchlistEntry>, AscentiaError>;
}

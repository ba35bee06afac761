//! SQLite watchlist store.

use crate::domain::error::AscentiaError;
use crate::domain::watchlist::{DATE_FORMAT, WatchlistEntry};
use crate::ports::config_port::ConfigPort;
use crate::ports::watchlist_port::WatchlistPort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::time::Duration;

pub const DEFAULT_POOL_SIZE: i64 = 4;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteWatchlistAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_error(e: r2d2::Error) -> AscentiaError {
    AscentiaError::store_unavailable(e.to_string())
}

fn query_error(e: rusqlite::Error) -> AscentiaError {
    AscentiaError::store_unavailable(e.to_string())
}

impl SqliteWatchlistAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, AscentiaError> {
        let db_path =
            config
                .get_string("watchlist", "sqlite_path")
                .ok_or_else(|| AscentiaError::ConfigMissing {
                    section: "watchlist".into(),
                    key: "sqlite_path".into(),
                })?;

        let pool_size = config
            .get_int("watchlist", "pool_size", DEFAULT_POOL_SIZE)
            .max(1) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(CONNECT_TIMEOUT)
            .build(manager)
            .map_err(pool_error)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    /// Single-connection in-memory store; every checkout sees the same
    /// database.
    pub fn in_memory() -> Result<Self, AscentiaError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_error)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, AscentiaError> {
        self.pool.get().map_err(pool_error)
    }

    pub fn initialize_schema(&self) -> Result<(), AscentiaError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS watchlist (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL,
                    ticker TEXT NOT NULL,
                    date_added TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_watchlist_username ON watchlist(username);",
            )
            .map_err(query_error)
    }
}

impl WatchlistPort for SqliteWatchlistAdapter {
    fn append(&self, entry: &WatchlistEntry) -> Result<(), AscentiaError> {
        self.conn()?
            .execute(
                "INSERT INTO watchlist (username, ticker, date_added) VALUES (?1, ?2, ?3)",
                params![entry.username, entry.ticker, entry.date_added_iso()],
            )
            .map_err(query_error)?;
        Ok(())
    }

    fn list_for(&self, username: &str) -> Result<Vec<WatchlistEntry>, AscentiaError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT username, ticker, date_added FROM watchlist
                 WHERE username = ?1
                 ORDER BY id ASC",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map(params![username], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(query_error)?;

        let mut entries = Vec::new();
        for row in rows {
            let (username, ticker, date_str) = row.map_err(query_error)?;
            let date_added = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
                AscentiaError::store_unavailable(format!(
                    "invalid date_added {date_str:?} for {ticker}: {e}"
                ))
            })?;
            entries.push(WatchlistEntry {
                username,
                ticker,
                date_added,
            });
        }

        Ok(entries)
    }
}

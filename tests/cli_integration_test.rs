//! CLI integration tests for command dispatch.
//!
//! Tests cover:
//! - Config loading failures and their exit codes
//! - Analyze against the CSV provider with real files on disk
//! - Watchlist add/list against a temporary SQLite store
//! - Degraded watchlist when no store is configured

mod common;

use ascentia::cli::{self, Cli};
use clap::Parser;
use common::*;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ExitCode doesn't implement PartialEq, so compare via Debug
fn same_code(actual: ExitCode, expected: ExitCode) -> bool {
    format!("{actual:?}") == format!("{expected:?}")
}

fn run(args: &[&str]) -> ExitCode {
    let mut argv = vec!["ascentia"];
    argv.extend_from_slice(args);
    cli::run(Cli::try_parse_from(argv).unwrap())
}

fn csv_ini(csv_dir: &Path, extra: &str) -> String {
    format!(
        "[market_data]\nprovider = csv\ncsv_dir = {}\n\n[analysis]\nlookback_years = 1\n\n{extra}",
        csv_dir.display()
    )
}

mod config_loading {
    use super::*;

    #[test]
    fn missing_config_file_is_config_error() {
        let code = run(&["analyze", "--config", "/nonexistent/ascentia.ini", "--ticker", "BHP.AX"]);
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn unknown_provider_is_config_error() {
        let file = write_temp_ini("[market_data]\nprovider = bloomberg\n");
        let path = file.path().to_str().unwrap();
        let code = run(&["analyze", "--config", path, "--ticker", "BHP.AX"]);
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn csv_provider_without_directory_is_config_error() {
        let file = write_temp_ini("[market_data]\nprovider = csv\n");
        let path = file.path().to_str().unwrap();
        let code = run(&["analyze", "--config", path, "--ticker", "BHP.AX"]);
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn load_config_reads_sections() {
        use ascentia::ports::config_port::ConfigPort;

        let dir = tempfile::TempDir::new().unwrap();
        let file = write_temp_ini(&csv_ini(dir.path(), ""));
        let config = cli::load_config(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.get_string("market_data", "provider").as_deref(), Some("csv"));
        assert_eq!(config.get_int("analysis", "lookback_years", 0), 1);
    }
}

mod analyze {
    use super::*;

    #[test]
    fn analyze_csv_ticker_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        write_csv_fixture(dir.path(), "BHP.AX", &linear_series(100.0, 160.0, 260));
        let file = write_temp_ini(&csv_ini(dir.path(), ""));
        let path = file.path().to_str().unwrap();

        let code = run(&["analyze", "--config", path, "--ticker", "bhp.ax"]);
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn missing_ticker_file_is_data_error() {
        let dir = tempfile::TempDir::new().unwrap();
        write_csv_fixture(dir.path(), "BHP.AX", &linear_series(100.0, 160.0, 260));
        let file = write_temp_ini(&csv_ini(dir.path(), ""));
        let path = file.path().to_str().unwrap();

        let code = run(&["analyze", "--config", path, "--ticker", "CBA.AX"]);
        assert!(same_code(code, ExitCode::from(5)));
    }

    #[test]
    fn malformed_ticker_is_input_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = write_temp_ini(&csv_ini(dir.path(), ""));
        let path = file.path().to_str().unwrap();

        let code = run(&["analyze", "--config", path, "--ticker", "B H P"]);
        assert!(same_code(code, ExitCode::from(4)));
    }
}

#[cfg(feature = "sqlite")]
mod watchlist {
    use super::*;

    #[test]
    fn add_then_list_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = dir.path().join("watchlist.db");
        let file = write_temp_ini(&csv_ini(
            dir.path(),
            &format!("[watchlist]\nsqlite_path = {}\n", db.display()),
        ));
        let path = file.path().to_str().unwrap();

        let added = run(&[
            "watchlist", "add", "--config", path, "--user", "alice", "--ticker", "BHP.AX",
        ]);
        assert!(same_code(added, ExitCode::SUCCESS));

        let listed = run(&["watchlist", "list", "--config", path, "--user", "alice"]);
        assert!(same_code(listed, ExitCode::SUCCESS));
        assert!(db.exists());
    }

    #[test]
    fn entries_persist_across_runs() {
        use ascentia::adapters::sqlite_adapter::SqliteWatchlistAdapter;
        use ascentia::ports::watchlist_port::WatchlistPort;

        let dir = tempfile::TempDir::new().unwrap();
        let db = dir.path().join("watchlist.db");
        let ini = csv_ini(
            dir.path(),
            &format!("[watchlist]\nsqlite_path = {}\n", db.display()),
        );
        let file = write_temp_ini(&ini);
        let path = file.path().to_str().unwrap();

        for ticker in ["BHP.AX", "CBA.AX", "BHP.AX"] {
            let code = run(&[
                "watchlist", "add", "--config", path, "--user", "alice", "--ticker", ticker,
            ]);
            assert!(same_code(code, ExitCode::SUCCESS));
        }

        let config = cli::load_config(&file.path().to_path_buf()).unwrap();
        let store = SqliteWatchlistAdapter::from_config(&config).unwrap();
        let tickers: Vec<String> = store
            .list_for("alice")
            .unwrap()
            .into_iter()
            .map(|e| e.ticker)
            .collect();
        assert_eq!(tickers, vec!["BHP.AX", "CBA.AX", "BHP.AX"]);
        assert!(store.list_for("bob").unwrap().is_empty());
    }

    #[test]
    fn unconfigured_store_is_store_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = write_temp_ini(&csv_ini(dir.path(), ""));
        let path = file.path().to_str().unwrap();

        let code = run(&[
            "watchlist", "add", "--config", path, "--user", "alice", "--ticker", "BHP.AX",
        ]);
        assert!(same_code(code, ExitCode::from(3)));
    }

    #[test]
    fn analyze_works_without_store() {
        let dir = tempfile::TempDir::new().unwrap();
        write_csv_fixture(dir.path(), "BHP.AX", &linear_series(100.0, 160.0, 260));
        let file = write_temp_ini(&csv_ini(dir.path(), ""));
        let path = file.path().to_str().unwrap();

        let code = run(&["analyze", "--config", path, "--ticker", "BHP.AX"]);
        assert!(same_code(code, ExitCode::SUCCESS));
    }
}

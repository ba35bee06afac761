//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::context::AppContext;
use crate::domain::error::AscentiaError;

#[derive(Parser, Debug)]
#[command(name = "ascentia", about = "Ten-indicator stock scoring with a personal watchlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a ticker and print the indicator breakdown
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: String,
    },
    /// Manage a user's watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Output an argon2 hash for a password read from stdin
    HashPassword,
}

#[derive(Subcommand, Debug)]
pub enum WatchlistAction {
    /// Append a ticker dated today
    Add {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        ticker: String,
    },
    /// Print the user's watchlist in the order it was built
    List {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        user: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    crate::logging::init();

    match cli.command {
        Command::Analyze { config, ticker } => run_analyze(&config, &ticker),
        Command::Watchlist {
            action: WatchlistAction::Add {
                config,
                user,
                ticker,
            },
        } => run_watchlist_add(&config, &user, &ticker),
        Command::Watchlist {
            action: WatchlistAction::List { config, user },
        } => run_watchlist_list(&config, &user),
        Command::Serve { config } => run_serve(&config),
        Command::HashPassword => run_hash_password(),
    }
}

fn fail(err: &AscentiaError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = match e {
            AscentiaError::Io(io) => AscentiaError::ConfigParse {
                file: path.display().to_string(),
                reason: io.to_string(),
            },
            other => other,
        };
        fail(&err)
    })
}

fn load_context(config_path: &PathBuf) -> Result<(FileConfigAdapter, AppContext), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let config = load_config(config_path)?;
    let context = AppContext::from_config(&config).map_err(|e| fail(&e))?;
    Ok((config, context))
}

fn run_analyze(config_path: &PathBuf, ticker: &str) -> ExitCode {
    let (_, context) = match load_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    eprintln!("Analyzing {} via {}...", ticker.trim(), context.provider_name());
    match context.analyze(ticker) {
        Ok(report) => {
            print!("{}", report.render_text());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_watchlist_add(config_path: &PathBuf, user: &str, ticker: &str) -> ExitCode {
    let (_, context) = match load_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match context.add_to_watchlist(user, ticker) {
        Ok(entry) => {
            println!(
                "Added {} to {}'s watchlist ({})",
                entry.ticker,
                entry.username,
                entry.date_added_iso()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_watchlist_list(config_path: &PathBuf, user: &str) -> ExitCode {
    let (_, context) = match load_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match context.watchlist_for(user) {
        Ok(entries) if entries.is_empty() => {
            eprintln!("{user} has no watchlist entries");
            ExitCode::SUCCESS
        }
        Ok(entries) => {
            println!("{:<12} {}", "TICKER", "DATE ADDED");
            for entry in &entries {
                println!("{:<12} {}", entry.ticker, entry.date_added_iso());
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::config_identity_adapter::ConfigIdentityAdapter;
        use crate::adapters::web::{AppState, DEFAULT_LISTEN, build_router};
        use crate::ports::config_port::ConfigPort;
        use std::net::SocketAddr;
        use std::sync::Arc;

        let (config, context) = match load_context(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let identity = match ConfigIdentityAdapter::from_config(&config) {
            Ok(i) => i,
            Err(e) => return fail(&e),
        };

        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(e) => {
                return fail(&AscentiaError::ConfigInvalid {
                    section: "web".into(),
                    key: "listen".into(),
                    reason: format!("{listen:?}: {e}"),
                });
            }
        };

        let state = AppState {
            context: Arc::new(context),
            identity: Arc::new(identity),
            config: Arc::new(config),
        };
        let router = match build_router(state) {
            Ok(r) => r,
            Err(e) => return fail(&e),
        };

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => return fail(&AscentiaError::Io(e)),
        };

        eprintln!("Starting web server on {addr}");
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "listening");
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&AscentiaError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}

fn run_hash_password() -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::config_identity_adapter::hash_password;
        use std::io::{self, BufRead};

        eprintln!("Enter password to hash:");
        let mut password = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut password) {
            return fail(&AscentiaError::Io(e));
        }
        let password = password.trim_end_matches(['\r', '\n']);
        if password.is_empty() {
            eprintln!("error: password must not be empty");
            return ExitCode::from(4);
        }

        match hash_password(password) {
            Ok(hash) => {
                println!("{hash}");
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        eprintln!("error: web feature is required for hash-password");
        ExitCode::from(1)
    }
}

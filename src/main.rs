//! reel-rs - TMDB sign-in TUI
//!
//! A terminal application for signing in to The Movie Database.
//! Run without arguments to launch the TUI, or use subcommands for CLI mode.
//!
//! Available as the `reel` command.

use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use reel_rs::cli::commands::{Cli, Commands};
use reel_rs::cli::{auth, config};
use reel_rs::core::config::Config;
use reel_rs::error::{ReelError, Result};
use reel_rs::tmdb::{KeyringSessionStore, TmdbAuthenticator, TmdbClient};
use reel_rs::tui::App;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it logs to a file
    init_logging(cli.command.is_none());

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

/// Initialize logging, to the log file in TUI mode and to stderr otherwise
fn init_logging(tui_mode: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if tui_mode {
        if let Some(file) = open_log_file() {
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
            return;
        }
    }

    builder.with_writer(std::io::stderr).init();
}

fn open_log_file() -> Option<fs::File> {
    let path = Config::log_path().ok()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Print an error for the user
fn handle_error(e: ReelError) {
    eprintln!("Error: {}", e);
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        // No subcommand - launch TUI mode
        None => run_tui().await,
        Some(Commands::Auth(args)) => auth::handle_auth(args.command).await,
        Some(Commands::Config(args)) => config::handle_config(args.command),
    }
}

/// Run the TUI application
async fn run_tui() -> Result<()> {
    let config = Config::load()?;
    let client = Arc::new(TmdbClient::from_config(&config)?);
    let authenticator = TmdbAuthenticator::new(client.clone(), KeyringSessionStore);

    // A stored session skips the sign-in screen
    let session = authenticator.stored_session().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable stored session");
        None
    });

    let mut app = App::new(client, Arc::new(authenticator)).with_session(session);
    app.run().await
}

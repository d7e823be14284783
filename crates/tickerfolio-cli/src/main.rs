//! Tickerfolio - stock portfolio tracking from the terminal
//!
//! Usage: tickerfolio <command>
//!
//! See `tickerfolio help` for the list of commands.

mod app;
mod cli;
mod views;

use std::io;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::Command;
use tickerfolio_core::Config;

const LOG_FILE_NAME: &str = "tickerfolio.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr, and to a file in the cache directory when one is
/// given. The returned guard must live until exit so the file is flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let log_dir = Config::default().cache_dir().ok();
    let _guard = init_tracing(log_dir.as_deref());

    let command = Command::parse(std::env::args().skip(1))?;
    debug!(?command, "Parsed command");

    if command == Command::Help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let mut app = App::new()?;
    info!("Tickerfolio starting");

    for line in app.run(command).await? {
        println!("{}", line);
    }
    Ok(())
}

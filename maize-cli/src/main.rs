//! Entry point of the `simple-maize` command.
//!
//! This binary parses the command line, sets up logging on stderr and
//! delegates the work to [`App`] from the `app` module.

mod app;

use anyhow::Result;
use app::{App, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Runs one assembly and prints the plant table to stdout.
///
/// Logging defaults to `info` and follows `RUST_LOG` when set.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app = App::from_cli(&cli)?;
    let table = app.run()?;
    app.write(&table, &mut std::io::stdout().lock())
}

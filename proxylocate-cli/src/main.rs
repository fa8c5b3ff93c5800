mod cli;
mod commands;
mod util;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    tracing::debug!(command = ?cli.command, "dispatching");

    let result = match cli.command {
        Commands::Fetch(args) => commands::fetch::execute(args, &cli.global),
        Commands::Env(args) => commands::env::execute(args, &cli.global),
        Commands::Paths(args) => commands::paths::execute(args, &cli.global),
        Commands::Probe(args) => commands::probe::execute(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(util::EXIT_ERROR)
        }
    }
}

/// Log to stderr; stdout carries command output only.
fn init_logging() {
    // Defaults to "warn" if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

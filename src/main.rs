//! Courier - in-memory agent-to-agent messaging broker with a two-phase
//! credential handshake.

use clap::Parser;
use std::process::ExitCode;

mod agent;
mod broker;
mod cli;
mod clock;
mod config;
mod error;
mod gatekeeper;
mod logging;
mod protocol;
mod web;

use cli::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; the guard keeps the file appender flushing.
    let _guard = match logging::init() {
        Ok((guard, _log_dir)) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Parse command line arguments
    let args = Commands::parse();

    // Run the command
    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

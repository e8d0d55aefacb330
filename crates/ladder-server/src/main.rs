// crates/ladder-server/src/main.rs
// ============================================================================
// Module: Ladder Binary
// Description: Command-line entry point for the Ladder game backend.
// Purpose: Load configuration and run the HTTP server.
// Dependencies: ladder-config, ladder-server, clap, tokio
// ============================================================================

//! ## Overview
//! The `ladder` binary loads configuration, builds the server, and serves
//! until interrupted. Fatal errors are written to stderr and reflected in
//! the process exit code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ladder_config::LadderConfig;
use ladder_server::LadderServer;

// ============================================================================
// SECTION: Command Line
// ============================================================================

/// Command-line arguments for the `ladder` binary.
#[derive(Debug, Parser)]
#[command(name = "ladder", version, about = "Game backend with a competitive leaderboard")]
struct Cli {
    /// Path to the configuration file. Falls back to `LADDER_CONFIG`, then
    /// `ladder.toml` in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Server entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(std::io::stderr(), "ladder: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration and serves until interrupted.
async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = LadderConfig::load(cli.config.as_deref()).map_err(|err| err.to_string())?;
    LadderServer::new(config)
        .serve()
        .await
        .map_err(|err| err.to_string())
}

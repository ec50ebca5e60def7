// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claimbot - unattended hourly claim bot.
//!
//! This is the binary entry point.

mod serve;
mod status;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use claimbot_config::{ClaimbotConfig, ConfigError};
use claimbot_core::ClaimbotError;

use crate::serve::RunMode;

/// Claimbot - unattended hourly claim bot.
#[derive(Parser, Debug)]
#[command(name = "claimbot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Claim from every target, round after round, until stopped (default).
    Run,
    /// Run a single round and exit.
    Once,
    /// Show per-target ledger totals without touching the network.
    Status {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            claimbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => serve::run_serve(config, RunMode::Forever).await,
        Commands::Once => serve::run_serve(config, RunMode::Once).await,
        Commands::Status { json, plain } => status::run_status(&config, json, plain).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

fn load_config(path: Option<&Path>) -> Result<ClaimbotConfig, Vec<ConfigError>> {
    match path {
        Some(path) => claimbot_config::load_and_validate_path(path),
        None => claimbot_config::load_and_validate(),
    }
}

/// Rejected credentials exit with 2 so a supervisor can stop restarting.
fn exit_code(error: &ClaimbotError) -> i32 {
    if error.is_fatal() { 2 } else { 1 }
}

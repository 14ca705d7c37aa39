//! addon-index - ecosystem addon discovery and scoring
//!
//! ## Commands
//!
//! - `update`: discover, enrich, score and publish the addon snapshot
//! - `stats`: print the recorded history of a metric as JSON or CSV
//!
//! Exit status: 0 on publish or "no update needed", otherwise the code of
//! the failure class (2 discovery, 3 scoring, 4 persistence, 5 metric store,
//! 6 serialization, 64 configuration).

mod args;
mod commands;

use std::process::ExitCode;

use addon_index_core::PipelineError;
use clap::Parser;
use tracing::{error, Level};

use args::{Cli, Commands};

/// Exit status for configuration and usage errors.
const EXIT_USAGE: u8 = 64;

/// Exit status for failures outside the pipeline taxonomy.
const EXIT_OTHER: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            e.print().ok();
            return ExitCode::from(code);
        }
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    addon_index_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Update(args) => commands::cmd_update(args, &cli.db_url, cli.json).await,
        Commands::Stats(args) => commands::cmd_stats(args, &cli.db_url).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PipelineError>()
        .map_or(EXIT_OTHER, PipelineError::exit_code)
}

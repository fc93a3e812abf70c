pub(crate) mod ai;
mod cli;
mod config;
mod diary;
pub(crate) mod digest;
mod error;
pub(crate) mod github;
mod io_utils;
mod logging;
pub(crate) mod serde_helpers;
pub(crate) mod time_utils;

pub(crate) use error::{AppError, AppResult};

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::setup_logger(cli.verbosity.tracing_level_filter(), cli.use_ansi());

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match diagnostic(&e) {
                Some(message) => eprintln!("{message}"),
                None => error!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Message written to stderr regardless of the log filter.
fn diagnostic(e: &AppError) -> Option<String> {
    match e {
        AppError::MissingConfig(_) => Some(format!("{}: {e}", env!("CARGO_PKG_NAME"))),
        _ => None,
    }
}

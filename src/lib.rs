//! treedupe: deterministic duplicate file resolution across directory trees.
//!
//! The library scans one or more source trees, groups byte-identical files
//! in two phases (size bucketing, then SHA-512 digest confirmation), reduces
//! each duplicate group to a single original through an ordered chain of
//! resolvers, and applies exactly one sink action to every file the chain
//! marked non-original.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use treedupe::cli::Cli;
//!
//! let cli = Cli::try_parse_from([
//!     "treedupe",
//!     "--resolve", "source-order",
//!     "--resolve", "arbitrary",
//!     "--sink", "output-only",
//!     "/srv/photos", "/srv/backup",
//! ]).unwrap();
//! let exit = treedupe::run(cli).unwrap();
//! assert_eq!(exit.as_i32(), 0);
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod resolve;
pub mod scanner;
pub mod sink;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::pipeline::Pipeline;
use crate::resolve::TerminalPrompt;

/// Run a full dedupe pass from parsed CLI arguments.
///
/// # Errors
///
/// Returns configuration errors and fatal pipeline failures; the caller maps
/// them to an exit code. Per-file problems are logged and do not surface
/// here.
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::from_cli(&cli)?;
    log::debug!("Configuration assembled: {:?}", config);

    let pipeline = Pipeline::new(config);
    let mut prompt = TerminalPrompt::new();
    let report = pipeline.run(&mut prompt)?;
    report.log_summary();

    Ok(ExitCode::Success)
}

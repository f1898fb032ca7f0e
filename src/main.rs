use clap::Parser;
use std::process;

use treedupe::cli::Cli;
use treedupe::config::ConfigError;
use treedupe::error::ExitCode;
use treedupe::logging;
use treedupe::pipeline::PipelineError;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let code = match treedupe::run(cli) {
        Ok(code) => code,
        Err(error) => {
            log::error!("{:#}", error);
            classify(&error)
        }
    };
    process::exit(code.as_i32());
}

/// Map a fatal error to its exit code.
fn classify(error: &anyhow::Error) -> ExitCode {
    if error.downcast_ref::<ConfigError>().is_some() {
        return ExitCode::ConfigError;
    }
    match error.downcast_ref::<PipelineError>() {
        Some(PipelineError::Canceled) => ExitCode::Interrupted,
        _ => ExitCode::GeneralError,
    }
}

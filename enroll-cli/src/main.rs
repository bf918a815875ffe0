mod args;
mod commands;
mod error;
mod notifier;
mod paths;

use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use crate::args::{Cli, Commands};
use crate::error::CliError;

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| CliError::Logger(format!("{}: {}", path.display(), e)))?;
            // File logs keep debug detail even without -v.
            WriteLogger::init(level.max(LevelFilter::Debug), Config::default(), file)
        }
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto),
    }
    .map_err(|e| CliError::Logger(e.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    log::debug!("enroll {} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Register(args) => commands::register(args).await,
        Commands::Check(args) => commands::check(args),
        Commands::Strength(args) => Ok(commands::strength(args)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! clipslicer
//!
//! Splits every video in a folder into fixed-duration clips.
//!
//! # Usage
//!
//! ```bash
//! clipslicer --source-dir videos --output-dir output --clip-duration 120
//! clipslicer inspect --input videos/holiday.mp4
//! ```
//!
//! Exit status is 0 when every video was split, 1 when one or more videos
//! failed, and 2 when the configuration, the source folder or the report
//! path is unusable.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use clipslicer_cli::cli::{commands, Cli, Commands};
use clipslicer_cli::utils::{LoggingConfig, LoggingSystem};
use clipslicer_cli::SplitError;

const EXIT_VIDEO_FAILED: u8 = 1;
const EXIT_FATAL: u8 = 2;

/// Main entry point for the clipslicer CLI
fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(EXIT_FATAL);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let logging = LoggingSystem::new(LoggingConfig {
        level: cli.log_level.parse()?,
        format: cli.log_format.parse()?,
    });
    logging.initialize()?;
    logging.log_system_info();
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_file = cli.config.clone();

    match cli.into_command() {
        Commands::Split(args) => {
            info!("Executing split command");
            let report = commands::split(args, config_file.as_deref())?;
            if report.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_VIDEO_FAILED))
            }
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(args, config_file.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Configuration, source-folder and report problems are fatal for the whole
/// run; anything else concerns a single video
fn exit_code_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<SplitError>() {
        Some(e) if e.is_fatal_for_run() => EXIT_FATAL,
        _ => EXIT_VIDEO_FAILED,
    }
}

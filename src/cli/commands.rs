//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::{LibavBackend, TomlConfigAdapter};
use crate::app::{BatchInteractor, InspectInteractor, InspectRequest};
use crate::cli::args::{InspectArgs, SplitArgs};
use crate::config::{ConfigOverrides, SplitterConfig};
use crate::error::SplitResult;
use crate::output::{BatchReport, ConsoleReporter};

/// Build the run configuration: defaults, then the TOML file, then
/// environment and command-line values
pub fn load_config(
    config_file: Option<&Path>,
    overrides: ConfigOverrides,
) -> SplitResult<SplitterConfig> {
    let mut config = SplitterConfig::default();
    if let Some(path) = config_file {
        config.apply(TomlConfigAdapter::new(path).load()?);
    }
    config.apply(overrides);
    config.validate()?;

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Execute the split command
pub fn split(args: SplitArgs, config_file: Option<&Path>) -> Result<BatchReport> {
    let config = load_config(config_file, args.overrides()).context("Invalid configuration")?;

    info!(
        "Source: {}, output: {}, clip duration: {}s",
        config.source_directory.display(),
        config.output_directory.display(),
        config.clip_duration_seconds
    );

    let backend = LibavBackend::new().context("Failed to initialize FFmpeg")?;
    let console = ConsoleReporter::new(args.quiet);
    let interactor = BatchInteractor::new(config, backend, console)?;

    let report = interactor
        .execute()
        .context("Failed to enumerate source videos")?;

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    Ok(report)
}

/// Execute the inspect command
pub fn inspect(args: InspectArgs, config_file: Option<&Path>) -> Result<()> {
    let config = load_config(config_file, args.overrides()).context("Invalid configuration")?;
    let backend = LibavBackend::new().context("Failed to initialize FFmpeg")?;

    let request = InspectRequest {
        input: args.input.clone(),
        clip_duration: config.clip_duration()?,
        json: args.json,
    };
    let response = InspectInteractor::new(backend)
        .execute(request)
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    print!("{}", response.summary);
    if args.json {
        println!();
    }
    Ok(())
}

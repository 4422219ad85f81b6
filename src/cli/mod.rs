//! CLI module for clipslicer
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{InspectArgs, SplitArgs};

/// clipslicer - split every video in a folder into fixed-length clips
///
/// Each video `<name>.<ext>` in the source folder is re-encoded into
/// `<output>/<name>/clips/clip_000.mp4`, `clip_001.mp4`, ...
#[derive(Parser, Debug)]
#[command(name = "clipslicer")]
#[command(about = "Split every video in a folder into fixed-length clips")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log format: pretty, compact or json
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: String,

    /// TOML configuration file with a [splitter] section
    #[arg(long, env = "CLIPSLICER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute; defaults to `split`
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub split: SplitArgs,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split every video in the source folder
    Split(SplitArgs),
    /// Show how a single video would be split
    Inspect(InspectArgs),
}

impl Cli {
    /// The command to run, with a bare invocation meaning `split`
    pub fn into_command(self) -> Commands {
        match self.command {
            Some(command) => command,
            None => Commands::Split(self.split),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_runs_split() {
        let cli = Cli::try_parse_from(["clipslicer", "--clip-duration", "30"]).unwrap();
        match cli.into_command() {
            Commands::Split(args) => assert_eq!(args.clip_duration, Some(30.0)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_split_subcommand() {
        let cli = Cli::try_parse_from([
            "clipslicer",
            "split",
            "--source-dir",
            "in",
            "--output-dir",
            "out",
            "--keep-stale",
        ])
        .unwrap();
        match cli.into_command() {
            Commands::Split(args) => {
                assert_eq!(args.source_dir, Some(PathBuf::from("in")));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert!(args.keep_stale);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_inspect_requires_input() {
        assert!(Cli::try_parse_from(["clipslicer", "inspect"]).is_err());
        let cli = Cli::try_parse_from(["clipslicer", "inspect", "--input", "a.mp4", "--json"]).unwrap();
        assert!(matches!(cli.into_command(), Commands::Inspect(args) if args.json));
    }
}

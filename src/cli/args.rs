//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::config::ConfigOverrides;

/// Arguments for the split command
#[derive(Args, Debug, Clone, Default)]
pub struct SplitArgs {
    /// Folder scanned for input videos [default: videos]
    #[arg(long, env = "CLIPSLICER_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Root folder for the clip output [default: output]
    #[arg(long, env = "CLIPSLICER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Clip length in seconds [default: 120]
    #[arg(long, env = "CLIPSLICER_CLIP_DURATION")]
    pub clip_duration: Option<f64>,

    /// Keep clip files left over from earlier runs
    #[arg(long)]
    pub keep_stale: bool,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Only print failures to the console
    #[arg(short, long)]
    pub quiet: bool,
}

impl SplitArgs {
    /// Values given on the command line or through the environment
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_directory: self.source_dir.clone(),
            output_directory: self.output_dir.clone(),
            clip_duration_seconds: self.clip_duration,
            extensions: None,
            clean_stale_clips: self.keep_stale.then_some(false),
        }
    }
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Clip length in seconds [default: 120]
    #[arg(long, env = "CLIPSLICER_CLIP_DURATION")]
    pub clip_duration: Option<f64>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            clip_duration_seconds: self.clip_duration,
            ..ConfigOverrides::default()
        }
    }
}

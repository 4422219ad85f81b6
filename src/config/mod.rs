//! Splitter configuration
//!
//! One `SplitterConfig` is built at startup from defaults, an optional TOML
//! file, environment variables and command-line flags (in increasing order of
//! precedence), validated once, and passed explicitly to every component.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::model::ClipDuration;
use crate::error::{SplitError, SplitResult};

/// Default folder scanned for input videos
pub const DEFAULT_SOURCE_DIRECTORY: &str = "videos";

/// Default root of the per-video output tree
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "output";

/// Default clip length in seconds
pub const DEFAULT_CLIP_DURATION_SECONDS: f64 = 120.0;

/// Extensions recognized as videos when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Complete configuration for a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Folder scanned (non-recursively) for input videos
    pub source_directory: PathBuf,
    /// Root under which `<name>/clips/` directories are created
    pub output_directory: PathBuf,
    /// Length of each clip in seconds
    pub clip_duration_seconds: f64,
    /// Recognized video extensions, compared case-insensitively
    pub extensions: Vec<String>,
    /// Remove clip files left over from earlier runs before writing
    pub clean_stale_clips: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            source_directory: PathBuf::from(DEFAULT_SOURCE_DIRECTORY),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            clip_duration_seconds: DEFAULT_CLIP_DURATION_SECONDS,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            clean_stale_clips: true,
        }
    }
}

/// Partial configuration; `None` leaves the underlying value untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub source_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub clip_duration_seconds: Option<f64>,
    pub extensions: Option<Vec<String>>,
    pub clean_stale_clips: Option<bool>,
}

impl SplitterConfig {
    /// Apply a layer of overrides on top of this configuration
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(source_directory) = overrides.source_directory {
            self.source_directory = source_directory;
        }
        if let Some(output_directory) = overrides.output_directory {
            self.output_directory = output_directory;
        }
        if let Some(seconds) = overrides.clip_duration_seconds {
            self.clip_duration_seconds = seconds;
        }
        if let Some(extensions) = overrides.extensions {
            self.extensions = extensions;
        }
        if let Some(clean) = overrides.clean_stale_clips {
            self.clean_stale_clips = clean;
        }
    }

    /// Check every value that can be checked without touching the filesystem
    pub fn validate(&self) -> SplitResult<()> {
        self.clip_duration()?;

        if self.normalized_extensions().is_empty() {
            return Err(SplitError::configuration(
                "at least one video extension must be configured",
            ));
        }
        if self.source_directory.as_os_str().is_empty() {
            return Err(SplitError::configuration("source directory must not be empty"));
        }
        if self.output_directory.as_os_str().is_empty() {
            return Err(SplitError::configuration("output directory must not be empty"));
        }
        Ok(())
    }

    /// Validated clip duration
    pub fn clip_duration(&self) -> SplitResult<ClipDuration> {
        ClipDuration::from_seconds(self.clip_duration_seconds)
    }

    /// Lowercase extensions without leading dots
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
}

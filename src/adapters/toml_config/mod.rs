// TOML config adapter - Configuration overrides from a TOML file

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::config::ConfigOverrides;
use crate::error::{SplitError, SplitResult};

/// File layout: every recognized key lives under `[splitter]`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    splitter: ConfigOverrides,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config_file_path: PathBuf,
}

impl TomlConfigAdapter {
    /// Create an adapter for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_file_path
    }

    /// Read and parse the file
    pub fn load(&self) -> SplitResult<ConfigOverrides> {
        let path = self.path();
        if !path.is_file() {
            return Err(SplitError::configuration(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SplitError::configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        let overrides = Self::parse(&content).map_err(|e| match e {
            SplitError::Configuration { message } => {
                SplitError::configuration(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;

        info!("Loaded configuration from {}", path.display());
        Ok(overrides)
    }

    /// Parse TOML content into overrides
    pub fn parse(content: &str) -> SplitResult<ConfigOverrides> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| SplitError::configuration(format!("invalid TOML config: {}", e)))?;
        Ok(file.splitter)
    }
}

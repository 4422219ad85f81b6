// Video enumerator - Lists candidate input videos in the source directory

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::SplitterConfig;
use crate::error::{SplitError, SplitResult};

/// Finds files with a recognized video extension directly inside a folder
#[derive(Debug, Clone)]
pub struct VideoEnumerator {
    extensions: Vec<String>,
}

impl VideoEnumerator {
    /// Create an enumerator using the configured extension allow-list
    pub fn new(config: &SplitterConfig) -> Self {
        Self {
            extensions: config.normalized_extensions(),
        }
    }

    /// Whether the path carries one of the recognized extensions
    pub fn is_video(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    /// List matching regular files, sorted by file name
    ///
    /// Subdirectories are not descended into. An empty result is not an error.
    pub fn enumerate(&self, directory: &Path) -> SplitResult<Vec<PathBuf>> {
        let dir_name = directory.display().to_string();
        let metadata = std::fs::metadata(directory).map_err(|e| SplitError::SourceDirectory {
            path: dir_name.clone(),
            message: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(SplitError::SourceDirectory {
                path: dir_name,
                message: "not a directory".to_string(),
            });
        }

        let mut videos = Vec::new();
        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // An unreadable child (e.g. a dangling symlink) is skipped;
                // failing to list the folder itself ends the run.
                Err(e) if e.depth() > 0 => {
                    warn!("Skipping unreadable entry in {}: {}", dir_name, e);
                    continue;
                }
                Err(e) => {
                    return Err(SplitError::Enumeration {
                        path: dir_name,
                        message: e.to_string(),
                    })
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if self.is_video(entry.path()) {
                videos.push(entry.into_path());
            } else {
                debug!("Ignoring non-video file {}", entry.path().display());
            }
        }

        debug!("Found {} videos in {}", videos.len(), dir_name);
        Ok(videos)
    }
}

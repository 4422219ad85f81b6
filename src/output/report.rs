//! Batch report serialized as JSON

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::SplitterConfig;
use crate::domain::model::SplitSummary;
use crate::error::{ErrorKind, SplitError, SplitResult};

/// One source video that could not be split
#[derive(Debug, Clone, Serialize)]
pub struct VideoFailure {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config: SplitterConfig,
    pub videos_found: usize,
    pub completed: Vec<SplitSummary>,
    pub failures: Vec<VideoFailure>,
}

impl BatchReport {
    /// Start a report for a run using `config`
    pub fn new(config: &SplitterConfig) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            config: config.clone(),
            videos_found: 0,
            completed: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_success(&mut self, summary: SplitSummary) {
        self.completed.push(summary);
    }

    pub fn record_failure(&mut self, path: &Path, error: &SplitError) {
        self.failures.push(VideoFailure {
            path: path.to_path_buf(),
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// True when no video failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn clips_written(&self) -> usize {
        self.completed.iter().map(|summary| summary.clips.len()).sum()
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> SplitResult<()> {
        let write_failed = |message: String| SplitError::Report {
            path: path.display().to_string(),
            message,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
        }

        let file = File::create(path).map_err(|e| write_failed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| write_failed(e.to_string()))?;
        writer.flush().map_err(|e| write_failed(e.to_string()))?;

        info!("Wrote batch report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_make_report_unsuccessful() {
        let mut report = BatchReport::new(&SplitterConfig::default());
        assert!(report.is_success());

        report.record_failure(
            Path::new("videos/bad.avi"),
            &SplitError::EmptyVideo {
                path: "videos/bad.avi".to_string(),
            },
        );
        assert!(!report.is_success());
        assert_eq!(report.failures[0].kind, ErrorKind::Open);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");

        let mut report = BatchReport::new(&SplitterConfig::default());
        report.videos_found = 3;
        report.finish();
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["videos_found"], 3);
        assert_eq!(value["config"]["clip_duration_seconds"], 120.0);
        assert!(value["finished_at"].is_string());
        assert_eq!(value["failures"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_unwritable_report_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let report = BatchReport::new(&SplitterConfig::default());
        let err = report.write_json(&blocker.join("run.json")).unwrap_err();
        assert!(matches!(err, SplitError::Report { .. }));
        assert!(err.is_fatal_for_run());
    }
}

//! Error handling module for ClipSlicer

use serde::Serialize;
use thiserror::Error;

/// Main error type for splitting operations
#[derive(Error, Debug)]
pub enum SplitError {
    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Source directory missing or not a directory
    #[error("Invalid source directory {path}: {message}")]
    SourceDirectory { path: String, message: String },

    /// Directory listing failed part way through
    #[error("Failed to enumerate {path}: {message}")]
    Enumeration { path: String, message: String },

    /// Frame rate missing, zero or too small for the clip duration
    #[error("Invalid frame rate for {path}: {message}")]
    InvalidFrameRate { path: String, message: String },

    /// Source video could not be opened
    #[error("Failed to open video {path}: {message}")]
    OpenFailed { path: String, message: String },

    /// Source video reports no frames
    #[error("Video contains no frames: {path}")]
    EmptyVideo { path: String },

    /// Decoding failed mid-stream
    #[error("Failed to decode {path}: {message}")]
    DecodeFailed { path: String, message: String },

    /// Output directory or clip file could not be written
    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInit { message: String },

    /// Batch report could not be written
    #[error("Failed to write report {path}: {message}")]
    Report { path: String, message: String },
}

/// Coarse classification used for exit codes and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Misconfiguration, fatal for the run or for one video
    Configuration,
    /// Source could not be opened or decoded
    Open,
    /// Output could not be created or written
    Write,
}

impl SplitError {
    /// Build a configuration error from any message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SplitError::Configuration { .. }
            | SplitError::SourceDirectory { .. }
            | SplitError::Enumeration { .. }
            | SplitError::InvalidFrameRate { .. }
            | SplitError::FFmpegInit { .. } => ErrorKind::Configuration,
            SplitError::OpenFailed { .. }
            | SplitError::EmptyVideo { .. }
            | SplitError::DecodeFailed { .. } => ErrorKind::Open,
            SplitError::WriteFailed { .. } | SplitError::Report { .. } => ErrorKind::Write,
        }
    }

    /// Whether the error should stop the whole run rather than one video
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            SplitError::Configuration { .. }
                | SplitError::SourceDirectory { .. }
                | SplitError::Enumeration { .. }
                | SplitError::FFmpegInit { .. }
                | SplitError::Report { .. }
        )
    }
}

/// Result type alias for splitting operations
pub type SplitResult<T> = std::result::Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rate_is_configuration_but_not_fatal() {
        let err = SplitError::InvalidFrameRate {
            path: "videos/a.mp4".to_string(),
            message: "frame rate is zero".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!err.is_fatal_for_run());
    }

    #[test]
    fn test_error_messages_name_the_file() {
        let err = SplitError::OpenFailed {
            path: "videos/broken.mov".to_string(),
            message: "Invalid data found when processing input".to_string(),
        };
        assert!(err.to_string().contains("videos/broken.mov"));
        assert_eq!(err.kind(), ErrorKind::Open);
    }

    #[test]
    fn test_configuration_is_fatal() {
        assert!(SplitError::configuration("clip duration must be positive").is_fatal_for_run());
    }

    #[test]
    fn test_report_failure_is_fatal_write_error() {
        let err = SplitError::Report {
            path: "reports/run.json".to_string(),
            message: "Permission denied".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Write);
        assert!(err.is_fatal_for_run());
    }
}

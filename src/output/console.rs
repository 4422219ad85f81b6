//! Human-facing progress lines
//!
//! These lines are the tool's console contract and go to stdout; diagnostic
//! logging goes through `tracing` to stderr.

use std::path::Path;

use crate::error::SplitError;
use crate::output::report::VideoFailure;

/// Prints per-run and per-video progress
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a reporter; a quiet reporter prints only failures
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn videos_found(&self, count: usize) {
        if !self.quiet {
            println!("Found {} videos.", count);
        }
    }

    pub fn no_videos(&self) {
        if !self.quiet {
            println!("No video files found in folder.");
        }
    }

    pub fn processing(&self, video: &Path) {
        if !self.quiet {
            println!("\n=== Processing: {} ===", video.display());
        }
    }

    pub fn extracting(&self) {
        if !self.quiet {
            println!("Extracting clips...");
        }
    }

    pub fn finished(&self, video: &Path) {
        if !self.quiet {
            println!("Finished: {}", video.display());
        }
    }

    pub fn video_failed(&self, video: &Path, error: &SplitError) {
        eprintln!("Failed: {}: {}", video.display(), error);
    }

    pub fn all_processed(&self) {
        if !self.quiet {
            println!("\nAll videos processed!");
        }
    }

    /// Closing summary when one or more videos failed
    pub fn failure_summary(&self, failures: &[VideoFailure], total: usize) {
        if failures.is_empty() {
            return;
        }
        eprintln!("{} of {} videos failed:", failures.len(), total);
        for failure in failures {
            eprintln!("  {}: {}", failure.path.display(), failure.message);
        }
    }
}

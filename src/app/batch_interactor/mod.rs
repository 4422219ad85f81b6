// Batch interactor - Runs the splitter over every video in the source directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::app::clip_splitter::ClipSplitter;
use crate::app::video_enumerator::VideoEnumerator;
use crate::config::SplitterConfig;
use crate::domain::model::ClipLayout;
use crate::error::{SplitError, SplitResult};
use crate::output::{BatchReport, ConsoleReporter};
use crate::ports::MediaBackend;

/// Interactor for the batch split use case
pub struct BatchInteractor<B: MediaBackend> {
    config: SplitterConfig,
    enumerator: VideoEnumerator,
    splitter: ClipSplitter<B>,
    console: ConsoleReporter,
}

impl<B: MediaBackend> BatchInteractor<B> {
    /// Validate the configuration and wire up the components
    pub fn new(config: SplitterConfig, backend: B, console: ConsoleReporter) -> SplitResult<Self> {
        config.validate()?;
        Ok(Self {
            enumerator: VideoEnumerator::new(&config),
            splitter: ClipSplitter::new(&config, backend, console.clone())?,
            config,
            console,
        })
    }

    /// Split every video found, one at a time
    ///
    /// A failure on one video is recorded and the batch moves on to the next.
    /// Only problems with the source directory itself abort the run.
    pub fn execute(&self) -> SplitResult<BatchReport> {
        let mut report = BatchReport::new(&self.config);

        let videos = self.enumerator.enumerate(self.config.source_directory())?;
        report.videos_found = videos.len();

        if videos.is_empty() {
            self.console.no_videos();
            report.finish();
            return Ok(report);
        }

        info!(
            "Splitting {} videos from {} into {}",
            videos.len(),
            self.config.source_directory().display(),
            self.config.output_directory().display()
        );
        self.console.videos_found(videos.len());

        // clips directory -> video whose clips it holds
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for video in &videos {
            self.console.processing(video);
            let outcome = self
                .check_output_free(video, &claimed)
                .and_then(|()| self.splitter.split(video));

            match outcome {
                Ok(summary) => {
                    claimed.insert(summary.clips_dir.clone(), video.clone());
                    info!(
                        "{}: {} clips, {} frames",
                        video.display(),
                        summary.clips.len(),
                        summary.frames_written()
                    );
                    report.record_success(summary);
                }
                Err(e) => {
                    error!("Failed to split {}: {}", video.display(), e);
                    self.console.video_failed(video, &e);
                    report.record_failure(video, &e);
                }
            }
        }

        self.console.all_processed();
        self.console.failure_summary(&report.failures, videos.len());
        report.finish();

        info!(
            "Batch complete: {} succeeded, {} failed, {} clips written",
            report.completed.len(),
            report.failures.len(),
            report.clips_written()
        );
        Ok(report)
    }

    /// Fail a video whose clips directory already holds another video's
    /// clips from this run, e.g. `trip.mov` after `trip.mp4`
    fn check_output_free(
        &self,
        video: &Path,
        claimed: &HashMap<PathBuf, PathBuf>,
    ) -> SplitResult<()> {
        let layout = ClipLayout::for_video(self.config.output_directory(), video)?;
        match claimed.get(layout.clips_dir()) {
            Some(owner) => Err(SplitError::WriteFailed {
                path: layout.clips_dir().display().to_string(),
                message: format!("already holds the clips of {}", owner.display()),
            }),
            None => Ok(()),
        }
    }
}

// Clip splitter - Partitions one video into fixed-length clips and re-encodes them

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span, warn};

use crate::config::SplitterConfig;
use crate::domain::model::*;
use crate::error::{SplitError, SplitResult};
use crate::output::ConsoleReporter;
use crate::ports::*;

/// Splits source videos into `clip_NNN.mp4` files under `<output>/<name>/clips/`
pub struct ClipSplitter<B: MediaBackend> {
    backend: B,
    output_directory: PathBuf,
    duration: ClipDuration,
    clean_stale_clips: bool,
    console: ConsoleReporter,
}

impl<B: MediaBackend> ClipSplitter<B> {
    /// Create a splitter; fails if the configured clip duration is invalid
    pub fn new(config: &SplitterConfig, backend: B, console: ConsoleReporter) -> SplitResult<Self> {
        Ok(Self {
            backend,
            output_directory: config.output_directory.clone(),
            duration: config.clip_duration()?,
            clean_stale_clips: config.clean_stale_clips,
            console,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Split one video
    ///
    /// The reader is opened and its frame rate and frame count checked before
    /// anything is created on disk. The clips directory is only created, and
    /// stale clips only removed, once the first frame has been decoded. Every
    /// clip writer is closed before the next clip starts, and on every error
    /// path.
    pub fn split(&self, video: &Path) -> SplitResult<SplitSummary> {
        let span = info_span!("split", video = %video.display());
        let _enter = span.enter();

        let mut reader = self.backend.open_reader(video)?;
        let properties = reader.properties().clone();
        let plan = ClipPlan::for_video(video, &properties, self.duration)?;
        if properties.total_frames == 0 {
            return Err(SplitError::EmptyVideo {
                path: video.display().to_string(),
            });
        }

        info!(
            "{}x{} @ {}, ~{} frames, {} frames per clip, {} clips expected",
            properties.width,
            properties.height,
            properties.frame_rate,
            properties.total_frames,
            plan.clip_length_frames,
            plan.clip_count()
        );

        let layout = ClipLayout::for_video(&self.output_directory, video)?;
        self.console.extracting();

        let spec = ClipOutputSpec::from(&properties);
        let mut output_ready = false;
        let mut clips = Vec::new();
        let mut start_frame = 0u64;
        loop {
            let index = clips.len();
            let path = layout.clip_path(index);

            reader.seek(start_frame)?;
            let frame_count = self.write_clip(
                &mut reader,
                &layout,
                &mut output_ready,
                &path,
                &spec,
                plan.clip_length_frames,
            )?;
            if frame_count == 0 {
                break;
            }

            debug!(
                "Wrote {} (frames {}..{})",
                path.display(),
                start_frame,
                start_frame + frame_count
            );
            clips.push(ClipRecord {
                index,
                path,
                start_frame,
                frame_count,
            });

            if frame_count < plan.clip_length_frames {
                break;
            }
            start_frame += frame_count;
        }

        if clips.is_empty() {
            return Err(SplitError::DecodeFailed {
                path: video.display().to_string(),
                message: "no frames could be decoded".to_string(),
            });
        }
        let decoded: u64 = clips.iter().map(|clip| clip.frame_count).sum();
        if decoded != properties.total_frames {
            warn!(
                "Reported frame count {} differs from {} frames decoded",
                properties.total_frames, decoded
            );
        }

        drop(reader);
        self.console.finished(video);

        Ok(SplitSummary {
            video: video.to_path_buf(),
            clips_dir: layout.clips_dir().to_path_buf(),
            properties,
            clip_length_frames: plan.clip_length_frames,
            expected_clips: plan.clip_count(),
            clips,
        })
    }

    /// Copy up to `clip_length` frames into a new clip
    ///
    /// The writer is created on the first frame, so a reader that is already
    /// at end of stream produces no file. Returns the number of frames written.
    fn write_clip(
        &self,
        reader: &mut B::Reader,
        layout: &ClipLayout,
        output_ready: &mut bool,
        path: &Path,
        spec: &ClipOutputSpec,
        clip_length: u64,
    ) -> SplitResult<u64> {
        let mut writer: Option<B::Writer> = None;
        let mut written = 0u64;

        while written < clip_length {
            let Some(frame) = reader.read_next_frame()? else {
                break;
            };
            if writer.is_none() {
                if !*output_ready {
                    self.prepare_output(layout)?;
                    *output_ready = true;
                }
                writer = Some(self.backend.create_writer(path, spec)?);
            }
            if let Some(writer) = writer.as_mut() {
                writer.write_frame(frame)?;
            }
            written += 1;
        }

        match writer {
            Some(writer) => writer.finish(),
            None => Ok(0),
        }
    }

    /// Create the clips directory and clear clips from earlier runs
    fn prepare_output(&self, layout: &ClipLayout) -> SplitResult<()> {
        let clips_dir = layout.clips_dir();
        fs::create_dir_all(clips_dir).map_err(|e| SplitError::WriteFailed {
            path: clips_dir.display().to_string(),
            message: e.to_string(),
        })?;

        if self.clean_stale_clips {
            let removed = remove_stale_clips(clips_dir)?;
            if removed > 0 {
                info!("Removed {} stale clips from {}", removed, clips_dir.display());
            }
        }
        Ok(())
    }
}

/// Delete every `clip_NNN.mp4` file directly inside `clips_dir`
fn remove_stale_clips(clips_dir: &Path) -> SplitResult<usize> {
    let write_failed = |path: &Path, e: std::io::Error| SplitError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut removed = 0;
    for entry in fs::read_dir(clips_dir).map_err(|e| write_failed(clips_dir, e))? {
        let entry = entry.map_err(|e| write_failed(clips_dir, e))?;
        let is_file = entry
            .file_type()
            .map(|file_type| file_type.is_file())
            .unwrap_or(false);
        let is_clip = entry
            .file_name()
            .to_str()
            .map(ClipLayout::is_clip_file_name)
            .unwrap_or(false);

        if is_file && is_clip {
            let path = entry.path();
            fs::remove_file(&path).map_err(|e| write_failed(&path, e))?;
            removed += 1;
        }
    }
    Ok(removed)
}

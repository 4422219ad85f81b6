//! In-memory media backend for driving the splitter without FFmpeg

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clipslicer_cli::config::SplitterConfig;
use clipslicer_cli::domain::model::{ClipOutputSpec, FrameRate, VideoProperties};
use clipslicer_cli::error::{SplitError, SplitResult};
use clipslicer_cli::ports::{ClipWriter, FrameReader, MediaBackend};

/// A synthetic source video; frames are their own indices
#[derive(Debug, Clone)]
pub struct FakeVideo {
    /// Frames the reader actually yields
    pub actual_frames: u64,
    /// Frame count the reader reports when opened
    pub reported_frames: u64,
    pub frame_rate: (u32, u32),
    /// Decoding this frame index fails
    pub fail_at: Option<u64>,
}

impl FakeVideo {
    pub fn new(frames: u64, fps: u32) -> Self {
        Self {
            actual_frames: frames,
            reported_frames: frames,
            frame_rate: (fps, 1),
            fail_at: None,
        }
    }

    pub fn reporting(mut self, reported_frames: u64) -> Self {
        self.reported_frames = reported_frames;
        self
    }

    pub fn failing_at(mut self, frame: u64) -> Self {
        self.fail_at = Some(frame);
        self
    }

    pub fn with_rate(mut self, num: u32, den: u32) -> Self {
        self.frame_rate = (num, den);
        self
    }
}

/// What happened to one clip writer
#[derive(Debug, Clone, Default)]
pub struct ClipLog {
    pub path: PathBuf,
    pub frames: Vec<u64>,
    pub finished: bool,
    pub closed: bool,
}

pub type WriterLog = Rc<RefCell<Vec<ClipLog>>>;

/// Backend keyed by source file name
#[derive(Default)]
pub struct FakeBackend {
    videos: HashMap<String, FakeVideo>,
    pub writers: WriterLog,
    pub seeks: Rc<RefCell<Vec<u64>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, file_name: &str, video: FakeVideo) -> Self {
        self.videos.insert(file_name.to_string(), video);
        self
    }

    pub fn clip_logs(&self) -> Vec<ClipLog> {
        self.writers.borrow().clone()
    }
}

pub struct FakeReader {
    video: FakeVideo,
    properties: VideoProperties,
    position: u64,
    seeks: Rc<RefCell<Vec<u64>>>,
}

impl FrameReader for FakeReader {
    type Frame = u64;

    fn properties(&self) -> &VideoProperties {
        &self.properties
    }

    fn seek(&mut self, frame_index: u64) -> SplitResult<()> {
        self.seeks.borrow_mut().push(frame_index);
        self.position = frame_index;
        Ok(())
    }

    fn read_next_frame(&mut self) -> SplitResult<Option<u64>> {
        if self.video.fail_at == Some(self.position) {
            return Err(SplitError::DecodeFailed {
                path: "fake".to_string(),
                message: format!("corrupt frame {}", self.position),
            });
        }
        if self.position >= self.video.actual_frames {
            return Ok(None);
        }
        let frame = self.position;
        self.position += 1;
        Ok(Some(frame))
    }
}

pub struct FakeWriter {
    slot: usize,
    log: WriterLog,
}

impl ClipWriter for FakeWriter {
    type Frame = u64;

    fn write_frame(&mut self, frame: u64) -> SplitResult<()> {
        self.log.borrow_mut()[self.slot].frames.push(frame);
        Ok(())
    }

    fn finish(self) -> SplitResult<u64> {
        let mut log = self.log.borrow_mut();
        log[self.slot].finished = true;
        Ok(log[self.slot].frames.len() as u64)
    }
}

impl Drop for FakeWriter {
    fn drop(&mut self) {
        self.log.borrow_mut()[self.slot].closed = true;
    }
}

impl MediaBackend for FakeBackend {
    type Frame = u64;
    type Reader = FakeReader;
    type Writer = FakeWriter;

    fn open_reader(&self, path: &Path) -> SplitResult<FakeReader> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let video = self
            .videos
            .get(name)
            .cloned()
            .ok_or_else(|| SplitError::OpenFailed {
                path: path.display().to_string(),
                message: "Invalid data found when processing input".to_string(),
            })?;

        let frame_rate = FrameRate::new(video.frame_rate.0, video.frame_rate.1).ok_or_else(|| {
            SplitError::InvalidFrameRate {
                path: path.display().to_string(),
                message: "frame rate is missing or zero".to_string(),
            }
        })?;

        Ok(FakeReader {
            properties: VideoProperties {
                width: 640,
                height: 360,
                frame_rate,
                total_frames: video.reported_frames,
            },
            video,
            position: 0,
            seeks: Rc::clone(&self.seeks),
        })
    }

    fn create_writer(&self, path: &Path, spec: &ClipOutputSpec) -> SplitResult<FakeWriter> {
        assert_eq!((spec.width, spec.height), (640, 360));
        fs::write(path, b"").map_err(|e| SplitError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut log = self.writers.borrow_mut();
        log.push(ClipLog {
            path: path.to_path_buf(),
            ..ClipLog::default()
        });
        Ok(FakeWriter {
            slot: log.len() - 1,
            log: Rc::clone(&self.writers),
        })
    }
}

/// Configuration rooted in a temporary directory
pub fn config_in(root: &Path, clip_duration_seconds: f64) -> SplitterConfig {
    SplitterConfig {
        source_directory: root.join("videos"),
        output_directory: root.join("output"),
        clip_duration_seconds,
        ..SplitterConfig::default()
    }
}

//! FFmpeg (libav) implementation of the media ports

use std::path::Path;

use ffmpeg_next::util::frame;

use crate::domain::model::ClipOutputSpec;
use crate::error::{SplitError, SplitResult};
use crate::ports::MediaBackend;

pub mod reader;
pub mod writer;

pub use reader::LibavFrameReader;
pub use writer::LibavClipWriter;

/// Media backend that decodes and encodes through FFmpeg
pub struct LibavBackend {
    _private: (),
}

impl LibavBackend {
    /// Initialize FFmpeg and quieten its own logging
    pub fn new() -> SplitResult<Self> {
        ffmpeg_next::init().map_err(|e| SplitError::FFmpegInit {
            message: e.to_string(),
        })?;
        ffmpeg_next::util::log::set_level(ffmpeg_next::util::log::Level::Error);

        Ok(Self { _private: () })
    }
}

impl MediaBackend for LibavBackend {
    type Frame = frame::Video;
    type Reader = LibavFrameReader;
    type Writer = LibavClipWriter;

    fn open_reader(&self, path: &Path) -> SplitResult<LibavFrameReader> {
        LibavFrameReader::open(path)
    }

    fn create_writer(&self, path: &Path, spec: &ClipOutputSpec) -> SplitResult<LibavClipWriter> {
        LibavClipWriter::create(path, spec)
    }
}

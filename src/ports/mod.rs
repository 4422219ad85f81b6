// Ports - Interface definitions (contracts)

use std::path::Path;

use crate::domain::model::*;
use crate::error::SplitResult;

/// Sequential frame source for one opened video
///
/// The reader stays open for every clip of its video and is released when
/// dropped.
pub trait FrameReader {
    type Frame;

    /// Properties read when the video was opened
    fn properties(&self) -> &VideoProperties;

    /// Position the reader so the next frame returned is `frame_index`
    fn seek(&mut self, frame_index: u64) -> SplitResult<()>;

    /// Next decoded frame, or `None` at end of stream
    fn read_next_frame(&mut self) -> SplitResult<Option<Self::Frame>>;
}

/// Encoder for one clip file
///
/// Dropping a writer without calling `finish` still flushes and closes the
/// file, so an error mid-clip never leaves it half written.
pub trait ClipWriter {
    type Frame;

    /// Encode one frame, in presentation order
    fn write_frame(&mut self, frame: Self::Frame) -> SplitResult<()>;

    /// Flush and close the clip, returning the number of frames written
    fn finish(self) -> SplitResult<u64>;
}

/// Factory for readers and writers sharing one frame type
pub trait MediaBackend {
    type Frame;
    type Reader: FrameReader<Frame = Self::Frame>;
    type Writer: ClipWriter<Frame = Self::Frame>;

    /// Open a source video for frame-sequential reading
    fn open_reader(&self, path: &Path) -> SplitResult<Self::Reader>;

    /// Create a clip file at `path`
    fn create_writer(&self, path: &Path, spec: &ClipOutputSpec) -> SplitResult<Self::Writer>;
}

//! Clip writer backed by the MPEG-4 Part 2 encoder

use std::path::{Path, PathBuf};

use ffmpeg_next::{self as ffmpeg, codec, format, software::scaling, util::frame, Rational};
use tracing::{debug, warn};

use crate::domain::model::ClipOutputSpec;
use crate::error::{SplitError, SplitResult};
use crate::ports::ClipWriter;

/// Encoder id for the "mp4v" codec tag
const CLIP_CODEC: codec::Id = codec::Id::MPEG4;

/// MPEG-4 Part 2 stores the time base denominator in 16 bits
const MAX_TIME_BASE_DENOMINATOR: u32 = 65535;

/// Pixel format accepted by the MPEG-4 encoder
const CLIP_PIXEL_FORMAT: format::Pixel = format::Pixel::YUV420P;

/// Encodes decoded frames into one `.mp4` clip
pub struct LibavClipWriter {
    path: PathBuf,
    output: format::context::Output,
    encoder: codec::encoder::video::Encoder,
    spec: ClipOutputSpec,
    scaler: Option<scaling::Context>,
    scaled: frame::Video,
    encoder_time_base: Rational,
    stream_time_base: Rational,
    frames_written: u64,
    finished: bool,
}

impl LibavClipWriter {
    /// Open the encoder, then create the clip file and write its header
    ///
    /// Nothing is created on disk when the encoder cannot be opened, and a
    /// file whose header cannot be written is removed again.
    pub fn create(path: &Path, spec: &ClipOutputSpec) -> SplitResult<Self> {
        let clip_name = path.display().to_string();
        let write_failed = |message: String| SplitError::WriteFailed {
            path: clip_name.clone(),
            message,
        };

        let clip_codec = codec::encoder::find(CLIP_CODEC)
            .ok_or_else(|| write_failed("MPEG-4 encoder not available".to_string()))?;

        let clip_rate = spec.frame_rate.limit_denominator(MAX_TIME_BASE_DENOMINATOR);
        if clip_rate != spec.frame_rate {
            debug!(
                "Approximating {} as {}/{} for the MPEG-4 time base",
                spec.frame_rate, clip_rate.num, clip_rate.den
            );
        }
        let frame_rate = Rational::new(clip_rate.num as i32, clip_rate.den as i32);
        let encoder_time_base = frame_rate.invert();

        let mut encoder = codec::context::Context::new_with_codec(clip_codec)
            .encoder()
            .video()
            .map_err(|e| write_failed(format!("failed to create video encoder: {}", e)))?;
        encoder.set_width(spec.width);
        encoder.set_height(spec.height);
        encoder.set_format(CLIP_PIXEL_FORMAT);
        encoder.set_frame_rate(Some(frame_rate));
        encoder.set_time_base(encoder_time_base);
        // The mp4 muxer stores codec extradata in the container header
        encoder.set_flags(codec::Flags::GLOBAL_HEADER);

        let encoder = encoder
            .open_as(clip_codec)
            .map_err(|e| write_failed(format!("failed to open video encoder: {}", e)))?;

        let mut output = format::output(path).map_err(|e| write_failed(e.to_string()))?;
        let stream_time_base =
            match Self::write_header(&mut output, &encoder, clip_codec, frame_rate) {
                Ok(time_base) => time_base,
                Err(message) => {
                    drop(output);
                    if let Err(e) = std::fs::remove_file(path) {
                        warn!("Failed to remove incomplete clip {}: {}", clip_name, e);
                    }
                    return Err(write_failed(message));
                }
            };

        debug!(
            "Created clip {} ({}x{}, {})",
            clip_name, spec.width, spec.height, spec.frame_rate
        );

        Ok(Self {
            path: path.to_path_buf(),
            output,
            encoder,
            spec: *spec,
            scaler: None,
            scaled: frame::Video::empty(),
            encoder_time_base,
            stream_time_base,
            frames_written: 0,
            finished: false,
        })
    }

    /// Add the video stream and write the container header, returning the
    /// stream time base the muxer settled on
    fn write_header(
        output: &mut format::context::Output,
        encoder: &codec::encoder::video::Encoder,
        clip_codec: codec::Codec,
        frame_rate: Rational,
    ) -> Result<Rational, String> {
        {
            let mut stream = output
                .add_stream(clip_codec)
                .map_err(|e| format!("failed to add video stream: {}", e))?;
            stream.set_parameters(encoder);
            stream.set_time_base(frame_rate.invert());
            stream.set_rate(frame_rate);
            stream.set_avg_frame_rate(frame_rate);
        }

        output
            .write_header()
            .map_err(|e| format!("failed to write header: {}", e))?;

        output
            .stream(0)
            .map(|stream| stream.time_base())
            .ok_or_else(|| "output stream missing after header".to_string())
    }

    fn write_error(&self, error: ffmpeg::Error) -> SplitError {
        SplitError::WriteFailed {
            path: self.path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Convert to the encoder's pixel format and size when the source differs
    fn needs_scaling(&self, frame: &frame::Video) -> bool {
        frame.format() != CLIP_PIXEL_FORMAT
            || frame.width() != self.spec.width
            || frame.height() != self.spec.height
    }

    /// Move every packet the encoder has ready into the container
    fn drain_packets(&mut self) -> SplitResult<()> {
        let mut packet = codec::packet::Packet::empty();
        while self.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(0);
            packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
            packet
                .write_interleaved(&mut self.output)
                .map_err(|e| self.write_error(e))?;
        }
        Ok(())
    }

    /// Flush the encoder and write the trailer; runs at most once
    fn finalize(&mut self) -> SplitResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        self.encoder.send_eof().map_err(|e| self.write_error(e))?;
        self.drain_packets()?;
        self.output
            .write_trailer()
            .map_err(|e| self.write_error(e))?;

        debug!(
            "Closed clip {} after {} frames",
            self.path.display(),
            self.frames_written
        );
        Ok(())
    }
}

impl ClipWriter for LibavClipWriter {
    type Frame = frame::Video;

    fn write_frame(&mut self, mut frame: frame::Video) -> SplitResult<()> {
        let pts = Some(self.frames_written as i64);

        if self.needs_scaling(&frame) {
            if self.scaler.is_none() {
                let scaler = scaling::Context::get(
                    frame.format(),
                    frame.width(),
                    frame.height(),
                    CLIP_PIXEL_FORMAT,
                    self.spec.width,
                    self.spec.height,
                    scaling::Flags::BILINEAR,
                )
                .map_err(|e| self.write_error(e))?;
                self.scaler = Some(scaler);
            }
            if let Some(scaler) = self.scaler.as_mut() {
                scaler
                    .run(&frame, &mut self.scaled)
                    .map_err(|e| SplitError::WriteFailed {
                        path: self.path.display().to_string(),
                        message: format!("pixel format conversion failed: {}", e),
                    })?;
            }
            self.scaled.set_pts(pts);
            self.encoder
                .send_frame(&self.scaled)
                .map_err(|e| self.write_error(e))?;
        } else {
            frame.set_pts(pts);
            self.encoder
                .send_frame(&frame)
                .map_err(|e| self.write_error(e))?;
        }

        self.frames_written += 1;
        self.drain_packets()
    }

    fn finish(mut self) -> SplitResult<u64> {
        self.finalize()?;
        Ok(self.frames_written)
    }
}

impl Drop for LibavClipWriter {
    fn drop(&mut self) {
        if let Err(e) = self.finalize() {
            warn!("Failed to close clip {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FrameRate;

    #[test]
    fn test_failed_encoder_open_creates_no_file() {
        ffmpeg::init().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip_000.mp4");
        let spec = ClipOutputSpec {
            width: 0,
            height: 0,
            frame_rate: FrameRate::new(30, 1).unwrap(),
        };

        assert!(LibavClipWriter::create(&path, &spec).is_err());
        assert!(!path.exists());
    }
}

//! Frame reader backed by libavformat/libavcodec

use std::path::{Path, PathBuf};

use ffmpeg_next::{self as ffmpeg, codec, format, media, util::frame, Rational};
use tracing::{debug, trace, warn};

use crate::domain::model::{FrameRate, VideoProperties};
use crate::error::{SplitError, SplitResult};
use crate::ports::FrameReader;

/// Decodes the best video stream of one file, frame by frame
pub struct LibavFrameReader {
    path: PathBuf,
    input: format::context::Input,
    decoder: codec::decoder::Video,
    stream_index: usize,
    time_base: Rational,
    start_pts: i64,
    properties: VideoProperties,
    /// Index of the next frame `read_next_frame` returns
    position: u64,
    /// Frame decoded while seeking, handed out on the next read
    pending: Option<frame::Video>,
    eof_sent: bool,
}

impl LibavFrameReader {
    /// Open a file and probe its video stream
    pub fn open(path: &Path) -> SplitResult<Self> {
        let source_name = path.display().to_string();
        let open_failed = |message: String| SplitError::OpenFailed {
            path: source_name.clone(),
            message,
        };

        let input = format::input(path).map_err(|e| open_failed(e.to_string()))?;

        let stream = input
            .streams()
            .best(media::Type::Video)
            .ok_or_else(|| open_failed("no video stream found".to_string()))?;
        let stream_index = stream.index();
        let time_base = stream.time_base();
        // AV_NOPTS_VALUE means the container did not record a start time
        let start_pts = match stream.start_time() {
            i64::MIN => 0,
            start => start,
        };

        let frame_rate = pick_frame_rate(stream.rate(), stream.avg_frame_rate())
            .ok_or_else(|| SplitError::InvalidFrameRate {
                path: source_name.clone(),
                message: "frame rate is missing or zero".to_string(),
            })?;

        let total_frames = estimate_total_frames(
            stream.frames(),
            stream.duration(),
            time_base,
            input.duration(),
            frame_rate,
        );

        let decoder = codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| open_failed(format!("failed to create decoder context: {}", e)))?
            .decoder()
            .video()
            .map_err(|e| open_failed(format!("failed to open video decoder: {}", e)))?;

        let properties = VideoProperties {
            width: decoder.width(),
            height: decoder.height(),
            frame_rate,
            total_frames,
        };
        if properties.width == 0 || properties.height == 0 {
            return Err(open_failed("video stream has no frame dimensions".to_string()));
        }

        debug!(
            "Opened {}: {}x{} @ {}, ~{} frames (stream {})",
            source_name, properties.width, properties.height, frame_rate, total_frames, stream_index
        );

        Ok(Self {
            path: path.to_path_buf(),
            input,
            decoder,
            stream_index,
            time_base,
            start_pts,
            properties,
            position: 0,
            pending: None,
            eof_sent: false,
        })
    }

    fn decode_error(&self, error: ffmpeg::Error) -> SplitError {
        SplitError::DecodeFailed {
            path: self.path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Pull the next frame out of the decoder, feeding packets as needed
    fn decode_next(&mut self) -> SplitResult<Option<frame::Video>> {
        let mut decoded = frame::Video::empty();
        loop {
            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => return Ok(Some(decoded)),
                Err(ffmpeg::Error::Eof) => return Ok(None),
                Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::util::error::EAGAIN => {}
                Err(e) => return Err(self.decode_error(e)),
            }
            if self.eof_sent {
                return Ok(None);
            }
            self.feed_decoder()?;
        }
    }

    /// Send the next packet of our stream, or end-of-stream once the file is exhausted
    fn feed_decoder(&mut self) -> SplitResult<()> {
        loop {
            let next = self
                .input
                .packets()
                .next()
                .map(|(stream, packet)| (stream.index(), packet));

            match next {
                Some((index, packet)) if index == self.stream_index => {
                    match self.decoder.send_packet(&packet) {
                        Ok(()) => return Ok(()),
                        Err(ffmpeg::Error::InvalidData) => {
                            warn!("Skipping corrupt packet in {}", self.path.display());
                        }
                        Err(e) => return Err(self.decode_error(e)),
                    }
                }
                Some(_) => {}
                None => {
                    trace!("End of packets in {}", self.path.display());
                    self.decoder.send_eof().map_err(|e| self.decode_error(e))?;
                    self.eof_sent = true;
                    return Ok(());
                }
            }
        }
    }

    /// Frame index of a decoded frame, derived from its timestamp
    fn frame_index_of(&self, frame: &frame::Video) -> Option<u64> {
        let timestamp = frame.timestamp()?;
        let seconds = (timestamp - self.start_pts) as f64 * f64::from(self.time_base);
        Some((seconds * self.properties.frame_rate.as_f64()).round().max(0.0) as u64)
    }
}

impl FrameReader for LibavFrameReader {
    type Frame = frame::Video;

    fn properties(&self) -> &VideoProperties {
        &self.properties
    }

    fn seek(&mut self, frame_index: u64) -> SplitResult<()> {
        if frame_index == self.position {
            return Ok(());
        }

        debug!(
            "Seeking {} from frame {} to frame {}",
            self.path.display(),
            self.position,
            frame_index
        );

        let start_seconds = self.start_pts as f64 * f64::from(self.time_base);
        let target_seconds = start_seconds + frame_index as f64 / self.properties.frame_rate.as_f64();
        let target_ts = (target_seconds * ffmpeg::ffi::AV_TIME_BASE as f64) as i64;

        // Lands on the keyframe at or before the target
        self.input
            .seek(target_ts, ..target_ts)
            .map_err(|e| self.decode_error(e))?;
        self.decoder.flush();
        self.pending = None;
        self.eof_sent = false;

        // Decode forward, discarding frames before the target
        while let Some(frame) = self.decode_next()? {
            let reached = self
                .frame_index_of(&frame)
                .map_or(true, |index| index >= frame_index);
            if reached {
                self.pending = Some(frame);
                break;
            }
        }
        self.position = frame_index;
        Ok(())
    }

    fn read_next_frame(&mut self) -> SplitResult<Option<frame::Video>> {
        let frame = match self.pending.take() {
            Some(frame) => Some(frame),
            None => self.decode_next()?,
        };
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }
}

/// Nominal frame rate (`r_frame_rate`) when set, else the average rate
///
/// Variable-frame-rate recordings report averages such as 10800000/360059;
/// the nominal rate is the one the container advertises.
fn pick_frame_rate(nominal: Rational, average: Rational) -> Option<FrameRate> {
    to_frame_rate(nominal).or_else(|| to_frame_rate(average))
}

fn to_frame_rate(rate: Rational) -> Option<FrameRate> {
    let (num, den) = (rate.numerator(), rate.denominator());
    if num <= 0 || den <= 0 {
        return None;
    }
    FrameRate::new(num as u32, den as u32)
}

/// Best available frame count: the container's frame count, else the stream
/// duration, else the container duration, converted at `frame_rate`
pub(crate) fn estimate_total_frames(
    stream_frames: i64,
    stream_duration: i64,
    time_base: Rational,
    container_duration: i64,
    frame_rate: FrameRate,
) -> u64 {
    if stream_frames > 0 {
        return stream_frames as u64;
    }

    let fps = frame_rate.as_f64();
    if stream_duration > 0 && time_base.denominator() > 0 {
        let seconds = stream_duration as f64 * f64::from(time_base);
        return (seconds * fps).round() as u64;
    }
    if container_duration > 0 {
        let seconds = container_duration as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
        return (seconds * fps).round() as u64;
    }
    0
}

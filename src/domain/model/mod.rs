// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{SplitError, SplitResult};

/// Container extension for every clip, matching the MPEG-4 Part 2 ("mp4v") encoder
pub const CLIP_CONTAINER: &str = "mp4";

/// Prefix of every clip file name
pub const CLIP_PREFIX: &str = "clip_";

/// Frame rate as a rational number of frames per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameRate {
    pub num: u32,
    pub den: u32,
}

impl FrameRate {
    /// Create a new frame rate, rejecting zero numerator or denominator
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if num == 0 || den == 0 {
            None
        } else {
            Some(Self { num, den })
        }
    }

    /// Convert to floating point frames per second
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Closest rate whose denominator is at most `max_den`
    ///
    /// Uses the continued-fraction convergents of `num / den`, then picks the
    /// nearer of the last convergent and the best semiconvergent.
    pub fn limit_denominator(&self, max_den: u32) -> FrameRate {
        let divisor = gcd(u64::from(self.num), u64::from(self.den));
        let (num, den) = (u64::from(self.num) / divisor, u64::from(self.den) / divisor);
        let max_den = u64::from(max_den.max(1));
        if den <= max_den {
            return FrameRate {
                num: num as u32,
                den: den as u32,
            };
        }

        let (mut p0, mut q0, mut p1, mut q1) = (0u64, 1u64, 1u64, 0u64);
        let (mut n, mut d) = (num, den);
        loop {
            let a = n / d;
            let q2 = q0 + a * q1;
            if q2 > max_den {
                break;
            }
            (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
            (n, d) = (d, n - a * d);
        }

        let k = (max_den - q0) / q1;
        let (semi_num, semi_den) = (p0 + k * p1, q0 + k * q1);
        let target = num as f64 / den as f64;
        let semi_error = (semi_num as f64 / semi_den as f64 - target).abs();
        let convergent_error = (p1 as f64 / q1 as f64 - target).abs();

        let (best_num, best_den) = if convergent_error <= semi_error {
            (p1, q1)
        } else {
            (semi_num, semi_den)
        };
        FrameRate::new(best_num as u32, best_den as u32).unwrap_or(*self)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} fps", self.as_f64())
    }
}

/// Properties read from a source video when it is opened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    /// Frame count reported by the container; an estimate, not a guarantee
    pub total_frames: u64,
}

/// Configured clip duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClipDuration {
    seconds: f64,
}

impl ClipDuration {
    /// Validate a duration; it must be finite and strictly positive
    pub fn from_seconds(seconds: f64) -> SplitResult<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(SplitError::configuration(format!(
                "clip duration must be a positive number of seconds, got {}",
                seconds
            )));
        }
        Ok(Self { seconds })
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Number of frames in a full clip: `floor(frame_rate * seconds)`
    ///
    /// A result of zero is rejected; without this guard the partition would
    /// never advance.
    pub fn frames_at(&self, frame_rate: FrameRate) -> Option<u64> {
        let frames = (frame_rate.as_f64() * self.seconds).floor();
        if frames >= 1.0 && frames.is_finite() {
            Some(frames as u64)
        } else {
            None
        }
    }
}

/// Half-open frame range `[start_frame, end_frame)` assigned to one clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClipRange {
    pub index: usize,
    pub start_frame: u64,
    pub end_frame: u64,
}

impl ClipRange {
    pub fn len(&self) -> u64 {
        self.end_frame - self.start_frame
    }

    pub fn is_empty(&self) -> bool {
        self.end_frame == self.start_frame
    }
}

/// Partition of `[0, total_frames)` into contiguous clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClipPlan {
    pub total_frames: u64,
    pub clip_length_frames: u64,
}

impl ClipPlan {
    /// Create a plan; `clip_length_frames` must be at least one
    pub fn new(total_frames: u64, clip_length_frames: u64) -> SplitResult<Self> {
        if clip_length_frames == 0 {
            return Err(SplitError::configuration(
                "clip length must be at least one frame",
            ));
        }
        Ok(Self {
            total_frames,
            clip_length_frames,
        })
    }

    /// Plan for a video with the given properties and clip duration
    pub fn for_video(
        path: &Path,
        properties: &VideoProperties,
        duration: ClipDuration,
    ) -> SplitResult<Self> {
        let clip_length_frames =
            duration
                .frames_at(properties.frame_rate)
                .ok_or_else(|| SplitError::InvalidFrameRate {
                    path: path.display().to_string(),
                    message: format!(
                        "{} with a {}s clip duration gives clips shorter than one frame",
                        properties.frame_rate,
                        duration.as_seconds()
                    ),
                })?;
        Self::new(properties.total_frames, clip_length_frames)
    }

    /// `ceil(total_frames / clip_length_frames)`
    pub fn clip_count(&self) -> u64 {
        self.total_frames.div_ceil(self.clip_length_frames)
    }

    /// Range for the clip at `index`, truncated to `total_frames`
    pub fn range(&self, index: usize) -> Option<ClipRange> {
        let start_frame = (index as u64).checked_mul(self.clip_length_frames)?;
        if start_frame >= self.total_frames {
            return None;
        }
        let end_frame = start_frame
            .saturating_add(self.clip_length_frames)
            .min(self.total_frames);
        Some(ClipRange {
            index,
            start_frame,
            end_frame,
        })
    }

    /// All ranges in ascending start order
    pub fn ranges(&self) -> impl Iterator<Item = ClipRange> + '_ {
        (0..).map_while(move |index| self.range(index))
    }
}

/// Output location for the clips of one source video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipLayout {
    clips_dir: PathBuf,
}

impl ClipLayout {
    /// `<output_root>/<video stem>/clips`
    pub fn for_video(output_root: &Path, video_path: &Path) -> SplitResult<Self> {
        let stem = video_path.file_stem().ok_or_else(|| {
            SplitError::configuration(format!(
                "cannot derive an output name from {}",
                video_path.display()
            ))
        })?;
        Ok(Self {
            clips_dir: output_root.join(stem).join("clips"),
        })
    }

    pub fn clips_dir(&self) -> &Path {
        &self.clips_dir
    }

    /// `clip_000.mp4`, `clip_001.mp4`, ...
    pub fn file_name(index: usize) -> String {
        format!("{}{:03}.{}", CLIP_PREFIX, index, CLIP_CONTAINER)
    }

    pub fn clip_path(&self, index: usize) -> PathBuf {
        self.clips_dir.join(Self::file_name(index))
    }

    /// Whether a file name looks like a clip this tool writes
    pub fn is_clip_file_name(name: &str) -> bool {
        name.strip_prefix(CLIP_PREFIX)
            .and_then(|rest| rest.strip_suffix(CLIP_CONTAINER))
            .and_then(|rest| rest.strip_suffix('.'))
            .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false)
    }
}

/// Encoder settings for one clip, copied from the source video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipOutputSpec {
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
}

impl From<&VideoProperties> for ClipOutputSpec {
    fn from(properties: &VideoProperties) -> Self {
        Self {
            width: properties.width,
            height: properties.height,
            frame_rate: properties.frame_rate,
        }
    }
}

/// One clip file that was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipRecord {
    pub index: usize,
    pub path: PathBuf,
    pub start_frame: u64,
    pub frame_count: u64,
}

/// Result of splitting one video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitSummary {
    pub video: PathBuf,
    pub clips_dir: PathBuf,
    pub properties: VideoProperties,
    pub clip_length_frames: u64,
    /// Clip count implied by the reported frame count
    pub expected_clips: u64,
    pub clips: Vec<ClipRecord>,
}

impl SplitSummary {
    pub fn frames_written(&self) -> u64 {
        self.clips.iter().map(|clip| clip.frame_count).sum()
    }
}

#[cfg(test)]
mod tests;

// Inspect interactor - Reports how a single video would be split

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::domain::model::*;
use crate::error::{SplitError, SplitResult};
use crate::ports::*;

/// Request for the inspect use case
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input: PathBuf,
    pub clip_duration: ClipDuration,
    pub json: bool,
}

/// Planned split of one video, without writing anything
#[derive(Debug, Clone, Serialize)]
pub struct VideoInspection {
    pub path: PathBuf,
    pub properties: VideoProperties,
    pub clip_duration_seconds: f64,
    pub clip_length_frames: u64,
    pub expected_clips: u64,
    pub clips: Vec<ClipRange>,
}

/// Response for the inspect use case
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub inspection: VideoInspection,
    pub summary: String,
}

/// Interactor for the inspect use case
pub struct InspectInteractor<B: MediaBackend> {
    backend: B,
}

impl<B: MediaBackend> InspectInteractor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Open the video, read its properties and compute the clip plan
    pub fn execute(&self, request: InspectRequest) -> SplitResult<InspectResponse> {
        let inspection = self.inspect(&request.input, request.clip_duration)?;
        let summary = if request.json {
            serde_json::to_string_pretty(&inspection).map_err(|e| SplitError::WriteFailed {
                path: "<stdout>".to_string(),
                message: format!("JSON serialization failed: {}", e),
            })?
        } else {
            format_as_text(&inspection)
        };
        Ok(InspectResponse {
            inspection,
            summary,
        })
    }

    pub fn inspect(&self, path: &Path, duration: ClipDuration) -> SplitResult<VideoInspection> {
        info!("Inspecting {}", path.display());

        let reader = self.backend.open_reader(path)?;
        let properties = reader.properties().clone();
        let plan = ClipPlan::for_video(path, &properties, duration)?;

        Ok(VideoInspection {
            path: path.to_path_buf(),
            clip_duration_seconds: duration.as_seconds(),
            clip_length_frames: plan.clip_length_frames,
            expected_clips: plan.clip_count(),
            clips: plan.ranges().collect(),
            properties,
        })
    }
}

fn format_as_text(inspection: &VideoInspection) -> String {
    let properties = &inspection.properties;
    let mut summary = String::new();

    summary.push_str(&format!("Video: {}\n", inspection.path.display()));
    summary.push_str(&format!(
        "  Resolution: {}x{}\n",
        properties.width, properties.height
    ));
    summary.push_str(&format!("  Frame rate: {}\n", properties.frame_rate));
    summary.push_str(&format!("  Frames: {} (reported)\n", properties.total_frames));
    summary.push_str(&format!(
        "  Clip length: {} frames ({}s)\n",
        inspection.clip_length_frames, inspection.clip_duration_seconds
    ));
    summary.push_str(&format!("  Clips: {}\n", inspection.expected_clips));

    let fps = properties.frame_rate.as_f64();
    for range in &inspection.clips {
        summary.push_str(&format!(
            "    {}  frames {}..{}  ({:.2}s - {:.2}s)\n",
            ClipLayout::file_name(range.index),
            range.start_frame,
            range.end_frame,
            range.start_frame as f64 / fps,
            range.end_frame as f64 / fps
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_summary_lists_every_clip() {
        let plan = ClipPlan::new(3900, 3600).unwrap();
        let inspection = VideoInspection {
            path: PathBuf::from("videos/trip.mp4"),
            properties: VideoProperties {
                width: 1280,
                height: 720,
                frame_rate: FrameRate::new(30, 1).unwrap(),
                total_frames: 3900,
            },
            clip_duration_seconds: 120.0,
            clip_length_frames: plan.clip_length_frames,
            expected_clips: plan.clip_count(),
            clips: plan.ranges().collect(),
        };

        let text = format_as_text(&inspection);
        assert!(text.contains("Resolution: 1280x720"));
        assert!(text.contains("Clips: 2"));
        assert!(text.contains("clip_000.mp4  frames 0..3600"));
        assert!(text.contains("clip_001.mp4  frames 3600..3900  (120.00s - 130.00s)"));
    }
}

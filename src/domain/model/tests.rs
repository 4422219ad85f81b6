// Unit tests for domain models

use super::*;
use std::path::Path;

fn properties(num: u32, den: u32, total_frames: u64) -> VideoProperties {
    VideoProperties {
        width: 1920,
        height: 1080,
        frame_rate: FrameRate::new(num, den).unwrap(),
        total_frames,
    }
}

fn plan(total_frames: u64, clip_length_frames: u64) -> ClipPlan {
    ClipPlan::new(total_frames, clip_length_frames).unwrap()
}

#[test]
fn test_frame_rate_rejects_zero() {
    assert!(FrameRate::new(0, 1).is_none());
    assert!(FrameRate::new(30, 0).is_none());
    assert!((FrameRate::new(30000, 1001).unwrap().as_f64() - 29.97).abs() < 0.01);
}

#[test]
fn test_limit_denominator_keeps_small_rates() {
    let ntsc = FrameRate::new(30000, 1001).unwrap();
    assert_eq!(ntsc.limit_denominator(65535), ntsc);
    assert_eq!(FrameRate::new(60, 2).unwrap().limit_denominator(65535), FrameRate::new(30, 1).unwrap());
}

#[test]
fn test_limit_denominator_approximates_variable_rates() {
    let phone = FrameRate::new(10_800_000, 360_059).unwrap();
    let limited = phone.limit_denominator(65535);

    assert!(limited.den <= 65535);
    assert!((limited.as_f64() - phone.as_f64()).abs() < 1e-6);
}

#[test]
fn test_clip_duration_validation() {
    assert!(ClipDuration::from_seconds(120.0).is_ok());
    assert!(ClipDuration::from_seconds(0.0).is_err());
    assert!(ClipDuration::from_seconds(-5.0).is_err());
    assert!(ClipDuration::from_seconds(f64::NAN).is_err());
    assert!(ClipDuration::from_seconds(f64::INFINITY).is_err());
}

#[test]
fn test_clip_length_is_floored() {
    let duration = ClipDuration::from_seconds(120.0).unwrap();
    assert_eq!(duration.frames_at(FrameRate::new(30, 1).unwrap()), Some(3600));
    assert_eq!(duration.frames_at(FrameRate::new(30000, 1001).unwrap()), Some(3596));

    let tiny = ClipDuration::from_seconds(0.01).unwrap();
    assert_eq!(tiny.frames_at(FrameRate::new(30, 1).unwrap()), None);
}

#[test]
fn test_plan_for_video_guards_zero_length_clips() {
    let tiny = ClipDuration::from_seconds(0.01).unwrap();
    let err = ClipPlan::for_video(Path::new("videos/a.mp4"), &properties(24, 1, 100), tiny)
        .unwrap_err();
    assert!(matches!(err, SplitError::InvalidFrameRate { .. }));
}

#[test]
fn test_plan_rejects_zero_clip_length() {
    assert!(ClipPlan::new(100, 0).is_err());
}

#[test]
fn test_130_seconds_at_30_fps() {
    let duration = ClipDuration::from_seconds(120.0).unwrap();
    let plan =
        ClipPlan::for_video(Path::new("videos/a.mp4"), &properties(30, 1, 3900), duration).unwrap();

    let ranges: Vec<_> = plan.ranges().collect();
    assert_eq!(plan.clip_count(), 2);
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].len(), 3600);
    assert_eq!(ranges[1].len(), 300);
    assert_eq!(ranges[1].start_frame, 3600);
}

#[test]
fn test_ranges_partition_total_frames() {
    for &(total, length) in &[(1u64, 1u64), (10, 3), (12, 4), (3601, 3600), (7, 100)] {
        let plan = plan(total, length);
        let ranges: Vec<_> = plan.ranges().collect();

        assert_eq!(ranges.len() as u64, plan.clip_count());
        assert_eq!(ranges.first().map(|r| r.start_frame), Some(0));
        assert_eq!(ranges.last().map(|r| r.end_frame), Some(total));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end_frame, pair[1].start_frame);
        }
        for (i, range) in ranges.iter().enumerate() {
            assert_eq!(range.index, i);
            assert!(!range.is_empty());
            if i + 1 < ranges.len() {
                assert_eq!(range.len(), length);
            }
        }
        assert_eq!(ranges.iter().map(ClipRange::len).sum::<u64>(), total);
    }
}

#[test]
fn test_last_clip_is_full_when_evenly_divisible() {
    let plan = plan(12, 4);
    let last = plan.ranges().last().unwrap();
    assert_eq!(last.len(), 4);
    assert_eq!(plan.clip_count(), 3);
}

#[test]
fn test_empty_video_has_no_clips() {
    let plan = plan(0, 3600);
    assert_eq!(plan.clip_count(), 0);
    assert_eq!(plan.ranges().count(), 0);
}

#[test]
fn test_layout_paths() {
    let layout = ClipLayout::for_video(Path::new("output"), Path::new("videos/Holiday.MOV")).unwrap();
    assert_eq!(layout.clips_dir(), Path::new("output/Holiday/clips"));
    assert_eq!(layout.clip_path(0), Path::new("output/Holiday/clips/clip_000.mp4"));
    assert_eq!(ClipLayout::file_name(42), "clip_042.mp4");
    assert_eq!(ClipLayout::file_name(1234), "clip_1234.mp4");
}

#[test]
fn test_clip_file_name_recognition() {
    assert!(ClipLayout::is_clip_file_name("clip_000.mp4"));
    assert!(ClipLayout::is_clip_file_name("clip_1234.mp4"));
    assert!(!ClipLayout::is_clip_file_name("clip_.mp4"));
    assert!(!ClipLayout::is_clip_file_name("clip_001.mov"));
    assert!(!ClipLayout::is_clip_file_name("notes.txt"));
    assert!(!ClipLayout::is_clip_file_name("clip_00a.mp4"));
}

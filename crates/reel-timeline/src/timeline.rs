//! Frame-indexed expansion of a composition's scenes.

use serde::Serialize;

use reel_models::{Composition, Scene};

use crate::color::validate_brand;
use crate::error::{TimelineError, TimelineResult};

/// Frame rate used when the caller does not configure one.
pub const DEFAULT_FPS: u32 = 30;

/// Contiguous, non-overlapping scene placement on the frame axis.
///
/// Scene `i` covers frames `frame_offsets[i] .. frame_offsets[i] + frame_counts[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    fps: u32,
    frame_offsets: Vec<u64>,
    frame_counts: Vec<u64>,
    total_frames: u64,
    duration_s: f64,
}

impl Timeline {
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Start frame of each scene.
    pub fn frame_offsets(&self) -> &[u64] {
        &self.frame_offsets
    }

    /// Frame count of each scene, always >= 1.
    pub fn frame_counts(&self) -> &[u64] {
        &self.frame_counts
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Requested duration: the sum of scene durations in seconds.
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn scene_count(&self) -> usize {
        self.frame_counts.len()
    }

    /// Map a global frame to `(scene_index, local_frame)`.
    pub fn locate(&self, frame: u64) -> TimelineResult<(usize, u64)> {
        if frame >= self.total_frames {
            return Err(TimelineError::FrameOutOfRange {
                frame,
                total_frames: self.total_frames,
            });
        }
        // Offsets are strictly increasing and start at 0, so this is >= 1.
        let index = self.frame_offsets.partition_point(|&offset| offset <= frame) - 1;
        Ok((index, frame - self.frame_offsets[index]))
    }
}

/// Number of frames a scene occupies: `round(duration_s * fps)`.
pub fn scene_frame_count(duration_s: f64, fps: u32) -> TimelineResult<u64> {
    if fps == 0 {
        return Err(TimelineError::invalid_scene("frame rate must be positive"));
    }
    if !duration_s.is_finite() || duration_s <= 0.0 {
        return Err(TimelineError::invalid_scene(format!(
            "duration_s must be a positive number, got {}",
            duration_s
        )));
    }
    let frames = (duration_s * f64::from(fps)).round();
    if frames < 1.0 {
        return Err(TimelineError::invalid_scene(format!(
            "duration {}s is shorter than one frame at {} fps",
            duration_s, fps
        )));
    }
    Ok(frames as u64)
}

/// Lay a composition's scenes out on the frame axis.
pub fn build_timeline(composition: &Composition, fps: u32) -> TimelineResult<Timeline> {
    build_from_scenes(&composition.scenes, fps)
}

/// Timeline plus brand color checks: everything that must hold before a
/// composition may be submitted for rendering.
pub fn validate_composition(composition: &Composition, fps: u32) -> TimelineResult<Timeline> {
    let timeline = build_timeline(composition, fps)?;
    validate_brand(&composition.brand)?;
    Ok(timeline)
}

fn build_from_scenes(scenes: &[Scene], fps: u32) -> TimelineResult<Timeline> {
    if scenes.is_empty() {
        return Err(TimelineError::invalid_scene("composition has no scenes"));
    }

    let mut frame_offsets = Vec::with_capacity(scenes.len());
    let mut frame_counts = Vec::with_capacity(scenes.len());
    let mut cursor = 0u64;
    let mut duration_s = 0.0;

    for (index, scene) in scenes.iter().enumerate() {
        let frames = scene_frame_count(scene.duration_s, fps).map_err(|e| match e {
            TimelineError::InvalidScene(msg) => {
                TimelineError::invalid_scene(format!("scene {}: {}", index, msg))
            }
            other => other,
        })?;
        frame_offsets.push(cursor);
        frame_counts.push(frames);
        cursor += frames;
        duration_s += scene.duration_s;
    }

    Ok(Timeline {
        fps,
        frame_offsets,
        frame_counts,
        total_frames: cursor,
        duration_s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_models::{BrandParams, Script, VideoStyle};

    fn composition(durations: &[f64]) -> Composition {
        let scenes = durations
            .iter()
            .enumerate()
            .map(|(i, d)| Scene::new(format!("Scene {}", i), "", *d))
            .collect();
        Composition::from_script(
            VideoStyle::Promo,
            &Script::new(scenes),
            BrandParams::default(),
            "Acme",
        )
    }

    #[test]
    fn test_no_cumulative_rounding_drift() {
        let c = composition(&[2.3, 1.7, 3.0]);
        let t = build_timeline(&c, 30).unwrap();

        assert_eq!(t.frame_counts(), &[69, 51, 90]);
        let summed: u64 = t.frame_counts().iter().sum();
        let expected = (c.total_duration_s() * 30.0).round() as u64;
        assert_eq!(summed, expected);
        assert_eq!(t.total_frames(), 210);
    }

    #[test]
    fn test_scenes_are_contiguous() {
        let t = build_timeline(&composition(&[1.0, 0.5, 2.0]), 24).unwrap();
        assert_eq!(t.frame_offsets(), &[0, 24, 36]);
        for i in 1..t.scene_count() {
            assert_eq!(
                t.frame_offsets()[i],
                t.frame_offsets()[i - 1] + t.frame_counts()[i - 1]
            );
        }
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = build_timeline(&composition(&[2.0, 0.0]), 30).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidScene(ref m) if m.starts_with("scene 1")));
    }

    #[test]
    fn test_negative_and_nan_durations_rejected() {
        assert!(build_timeline(&composition(&[-1.0]), 30).is_err());
        assert!(build_timeline(&composition(&[f64::NAN]), 30).is_err());
        assert!(build_timeline(&composition(&[f64::INFINITY]), 30).is_err());
    }

    #[test]
    fn test_sub_frame_scene_rejected() {
        let err = build_timeline(&composition(&[0.01]), 30).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidScene(_)));
    }

    #[test]
    fn test_empty_and_zero_fps_rejected() {
        assert!(build_timeline(&composition(&[]), 30).is_err());
        assert!(build_timeline(&composition(&[1.0]), 0).is_err());
    }

    #[test]
    fn test_locate() {
        let t = build_timeline(&composition(&[1.0, 2.0]), 30).unwrap();
        assert_eq!(t.locate(0).unwrap(), (0, 0));
        assert_eq!(t.locate(29).unwrap(), (0, 29));
        assert_eq!(t.locate(30).unwrap(), (1, 0));
        assert_eq!(t.locate(89).unwrap(), (1, 59));
        assert_eq!(
            t.locate(90).unwrap_err(),
            TimelineError::FrameOutOfRange {
                frame: 90,
                total_frames: 90
            }
        );
    }

    #[test]
    fn test_validate_composition_checks_colors() {
        let mut c = composition(&[1.0]);
        c.brand.accent_color = "#GGG".to_string();
        assert!(matches!(
            validate_composition(&c, 30),
            Err(TimelineError::InvalidColor(_))
        ));
    }
}

//! Clamped animation curves.
//!
//! All curves are piecewise-linear in the scene-local frame and clamp at
//! both ends: they never extrapolate and never return NaN.

use crate::error::{TimelineError, TimelineResult};

/// Initial downward offset of sliding text, in pixels.
pub const SLIDE_DISTANCE_PX: f64 = 30.0;
/// Time for sliding text to settle.
pub const SLIDE_DURATION_S: f64 = 0.4;
/// Starting scale of the pop-in.
pub const POP_START_SCALE: f64 = 0.9;
/// Time for the pop-in to reach full size.
pub const POP_DURATION_S: f64 = 0.2;

/// Linear map of `x` from `input` to `output`, clamped to the output range.
///
/// A zero-width (or inverted) input range is a step at `input.0`.
pub fn interpolate_clamped(x: f64, input: (f64, f64), output: (f64, f64)) -> f64 {
    let (x0, x1) = input;
    let (y0, y1) = output;
    if x.is_nan() {
        return y0;
    }
    if x < x0 {
        return y0;
    }
    if x >= x1 {
        return y1;
    }
    let t = (x - x0) / (x1 - x0);
    y0 + (y1 - y0) * t
}

/// Scene opacity at `local_frame`.
///
/// Ramps 0 -> 1 over the first `fade_in_s * fps` frames, holds at 1, and
/// ramps 1 -> 0 over the last `fade_out_s * fps` frames. When the two
/// windows overlap on a short scene the lower ramp wins.
pub fn evaluate_opacity(
    local_frame: i64,
    total_frames: u64,
    fps: u32,
    fade_in_s: f64,
    fade_out_s: f64,
) -> TimelineResult<f64> {
    if total_frames == 0 {
        return Err(TimelineError::invalid_scene("scene has zero frames"));
    }
    check_fps(fps)?;
    let fade_in = fade_frames(fade_in_s, fps)?;
    let fade_out = fade_frames(fade_out_s, fps)?;

    let total = total_frames as f64;
    let frame = (local_frame as f64).clamp(0.0, total);

    let rising = interpolate_clamped(frame, (0.0, fade_in), (0.0, 1.0));
    let falling = interpolate_clamped(frame, (total - fade_out, total), (1.0, 0.0));

    Ok(rising.min(falling).clamp(0.0, 1.0))
}

/// Vertical text offset in pixels: +30 -> 0 over the first 0.4s.
pub fn evaluate_offset(local_frame: i64, fps: u32) -> TimelineResult<f64> {
    check_fps(fps)?;
    let end = SLIDE_DURATION_S * f64::from(fps);
    Ok(interpolate_clamped(
        local_frame as f64,
        (0.0, end),
        (SLIDE_DISTANCE_PX, 0.0),
    ))
}

/// Pop-in scale: 0.9 -> 1.0 over the first 0.2s.
pub fn evaluate_scale(local_frame: i64, fps: u32) -> TimelineResult<f64> {
    check_fps(fps)?;
    let end = POP_DURATION_S * f64::from(fps);
    Ok(interpolate_clamped(
        local_frame as f64,
        (0.0, end),
        (POP_START_SCALE, 1.0),
    ))
}

fn check_fps(fps: u32) -> TimelineResult<()> {
    if fps == 0 {
        return Err(TimelineError::invalid_scene("frame rate must be positive"));
    }
    Ok(())
}

fn fade_frames(seconds: f64, fps: u32) -> TimelineResult<f64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(TimelineError::invalid_scene(format!(
            "fade length must be a non-negative number, got {}",
            seconds
        )));
    }
    Ok(seconds * f64::from(fps))
}

//! Frame sampling for previews.

use reel_models::Composition;
use reel_timeline::{evaluate_frame, validate_composition, FrameState};

use crate::error::{WorkerError, WorkerResult};

/// Evaluate every `every`-th frame of `composition`, always including the
/// final frame.
pub fn sample_frames(
    composition: &Composition,
    fps: u32,
    every: u64,
) -> WorkerResult<Vec<FrameState>> {
    if every == 0 {
        return Err(WorkerError::invalid_request("frame step must be at least 1"));
    }
    let timeline = validate_composition(composition, fps)?;
    let last = timeline.total_frames() - 1;

    let mut frames = Vec::new();
    let mut frame = 0;
    while frame <= last {
        frames.push(evaluate_frame(composition, &timeline, frame)?);
        frame += every;
    }
    if last % every != 0 {
        frames.push(evaluate_frame(composition, &timeline, last)?);
    }
    Ok(frames)
}

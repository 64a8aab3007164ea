//! Timeline error types.

use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

/// Malformed composition input.
///
/// These are caller bugs and are raised before any network call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Frame {frame} is outside the timeline (total {total_frames} frames)")]
    FrameOutOfRange { frame: u64, total_frames: u64 },
}

impl TimelineError {
    pub fn invalid_scene(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }

    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }
}

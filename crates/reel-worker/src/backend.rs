//! Render backend seam.
//!
//! The orchestrator talks to the rendering service through [`RenderBackend`]:
//! submit a composition, poll its progress, and download the finished file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use reel_models::{Composition, JobHandle};
use reel_timeline::Timeline;

use crate::config::RenderConfig;
use crate::error::{WorkerError, WorkerResult};

/// A render submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// "PromoVideo" or "SocialClip"
    pub composition_id: String,
    /// Composition plus timing derived from the validated timeline
    pub input_props: serde_json::Value,
    pub codec: String,
    pub max_retries: u32,
}

#[derive(Serialize)]
struct InputProps<'a> {
    #[serde(flatten)]
    composition: &'a Composition,
    fps: u32,
    duration_in_frames: u64,
}

impl RenderRequest {
    /// Build the submission for an already validated composition.
    pub fn new(
        composition: &Composition,
        timeline: &Timeline,
        config: &RenderConfig,
    ) -> WorkerResult<Self> {
        let input_props = serde_json::to_value(InputProps {
            composition,
            fps: timeline.fps(),
            duration_in_frames: timeline.total_frames(),
        })
        .map_err(|e| {
            WorkerError::submission_failed(format!("Failed to encode input props: {}", e))
        })?;

        Ok(Self {
            composition_id: composition.style.composition_id().to_string(),
            input_props,
            codec: config.codec.clone(),
            max_retries: config.backend_max_retries,
        })
    }
}

/// Error entry reported by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendErrorInfo {
    pub message: String,
}

/// Progress document returned by a poll.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollStatus {
    #[serde(default)]
    pub overall_progress: f64,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default)]
    pub fatal_error_encountered: bool,
    #[serde(default)]
    pub errors: Vec<BackendErrorInfo>,
}

impl PollStatus {
    pub fn in_progress(progress: f64) -> Self {
        Self {
            overall_progress: progress,
            ..Default::default()
        }
    }

    pub fn finished(output_file: impl Into<String>) -> Self {
        Self {
            overall_progress: 1.0,
            done: true,
            output_file: Some(output_file.into()),
            ..Default::default()
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            fatal_error_encountered: true,
            errors: vec![BackendErrorInfo {
                message: message.into(),
            }],
            ..Default::default()
        }
    }

    /// Backend error messages joined for logs and the `RenderFailed` error.
    pub fn error_message(&self) -> String {
        let messages: Vec<&str> = self
            .errors
            .iter()
            .map(|e| e.message.trim())
            .filter(|m| !m.is_empty())
            .collect();
        if messages.is_empty() {
            "render backend reported a fatal error".to_string()
        } else {
            messages.join("; ")
        }
    }
}

/// Remote rendering service.
#[async_trait]
pub trait RenderBackend: Send + Sync {
    /// Start a render. A rejection is a `SubmissionFailed` error.
    async fn submit(&self, request: &RenderRequest) -> WorkerResult<JobHandle>;

    /// Fetch the current progress of a render.
    async fn poll(&self, handle: &JobHandle) -> WorkerResult<PollStatus>;

    /// Download the finished file referenced by a poll's `output_file`.
    async fn fetch_output(&self, output_ref: &str) -> WorkerResult<Vec<u8>>;
}

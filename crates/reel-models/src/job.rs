//! Render job definitions.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::VideoStyle;

/// Unique identifier for a render job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by the render backend on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobHandle {
    /// Backend render id
    pub render_id: String,
    /// Storage scope the backend writes its output into
    pub bucket_name: String,
}

/// Render job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    /// Not yet accepted by the backend
    #[default]
    Queued,
    /// Accepted and being polled
    Rendering,
    /// Backend produced an output file
    Done,
    /// Backend reported a fatal error
    Failed,
    /// Poll budget exhausted
    TimedOut,
}

impl RenderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderState::Queued => "queued",
            RenderState::Rendering => "rendering",
            RenderState::Done => "done",
            RenderState::Failed => "failed",
            RenderState::TimedOut => "timed_out",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderState::Done | RenderState::Failed | RenderState::TimedOut)
    }
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracking record for one remote render.
///
/// Scoped to a single request and mutated only by the orchestrator's poll
/// loop. Transition methods return `false` and leave the job untouched when
/// the transition is not allowed from the current state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderJob {
    pub id: JobId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<JobHandle>,

    #[serde(default)]
    pub state: RenderState,

    /// Overall progress (0.0 - 1.0)
    #[serde(default)]
    pub progress: f64,

    /// Backend output file, set on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_ref: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Number of poll attempts made
    #[serde(default)]
    pub attempts: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RenderJob {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            handle: None,
            state: RenderState::Queued,
            progress: 0.0,
            output_ref: None,
            error: None,
            attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Backend accepted the submission.
    pub fn start(&mut self, handle: JobHandle) -> bool {
        if self.state != RenderState::Queued {
            return false;
        }
        self.handle = Some(handle);
        self.state = RenderState::Rendering;
        self.touch();
        true
    }

    /// Record one poll attempt and the progress it reported.
    ///
    /// Non-finite progress values keep the previous progress.
    pub fn record_poll(&mut self, progress: f64) -> bool {
        if self.state != RenderState::Rendering {
            return false;
        }
        self.attempts += 1;
        if progress.is_finite() {
            self.progress = progress.clamp(0.0, 1.0);
        }
        self.touch();
        true
    }

    pub fn complete(&mut self, output_ref: impl Into<String>) -> bool {
        if self.state != RenderState::Rendering {
            return false;
        }
        self.state = RenderState::Done;
        self.progress = 1.0;
        self.output_ref = Some(output_ref.into());
        self.touch();
        true
    }

    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.state = RenderState::Failed;
        self.error = Some(error.into());
        self.touch();
        true
    }

    pub fn time_out(&mut self) -> bool {
        if self.state != RenderState::Rendering {
            return false;
        }
        self.state = RenderState::TimedOut;
        self.error = Some(format!("no output after {} poll attempts", self.attempts));
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for RenderJob {
    fn default() -> Self {
        Self::new()
    }
}

/// Finished asset, produced once when a job reaches `Done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderResult {
    /// Public URL in the persistent store
    pub asset_url: String,
    /// Requested duration (sum of scene durations)
    pub duration_s: f64,
    pub style: VideoStyle,
}

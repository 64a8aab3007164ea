//! Worker error types.

use thiserror::Error;

use reel_storage::StorageError;
use reel_timeline::TimelineError;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Message shown to end users for any failure that is not a degraded result.
pub const GENERIC_FAILURE_MESSAGE: &str = "We couldn't finish your video. Please try again.";

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid composition: {0}")]
    InvalidComposition(#[from] TimelineError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Render submission rejected: {0}")]
    SubmissionFailed(String),

    #[error("Render poll failed: {0}")]
    PollFailed(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Render timed out after {attempts} poll attempts ({elapsed_secs}s)")]
    RenderTimedOut { attempts: u32, elapsed_secs: u64 },

    #[error("Voiceover unavailable: {0}")]
    SynthesisUnavailable(String),

    #[error("Asset transfer failed: {0}")]
    StoreTransfer(String),

    #[error("Script generation failed: {0}")]
    ScriptFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for WorkerError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidKey(msg) => Self::InvalidRequest(msg),
            other => Self::StoreTransfer(other.to_string()),
        }
    }
}

impl WorkerError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn submission_failed(msg: impl Into<String>) -> Self {
        Self::SubmissionFailed(msg.into())
    }

    pub fn poll_failed(msg: impl Into<String>) -> Self {
        Self::PollFailed(msg.into())
    }

    pub fn render_failed(msg: impl Into<String>) -> Self {
        Self::RenderFailed(msg.into())
    }

    pub fn synthesis_unavailable(msg: impl Into<String>) -> Self {
        Self::SynthesisUnavailable(msg.into())
    }

    pub fn store_transfer(msg: impl Into<String>) -> Self {
        Self::StoreTransfer(msg.into())
    }

    pub fn script_failed(msg: impl Into<String>) -> Self {
        Self::ScriptFailed(msg.into())
    }

    pub fn persistence_failed(msg: impl Into<String>) -> Self {
        Self::PersistenceFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if the render ran out of poll attempts or request budget.
    ///
    /// The pipeline degrades to a partial result on this error instead of
    /// failing the request.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WorkerError::RenderTimedOut { .. })
    }

    /// Check if the error was caused by the request itself (bad scenes,
    /// colors, or identifiers). These fail before any network call.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            WorkerError::InvalidComposition(_) | WorkerError::InvalidRequest(_)
        )
    }

    /// Check if the caller may retry the whole request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkerError::PollFailed(_)
                | WorkerError::RenderFailed(_)
                | WorkerError::RenderTimedOut { .. }
                | WorkerError::StoreTransfer(_)
                | WorkerError::ScriptFailed(_)
                | WorkerError::PersistenceFailed(_)
        )
    }

    /// Message safe to show to end users. Backend details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            WorkerError::InvalidComposition(e) => format!("Your video could not be built: {}", e),
            WorkerError::InvalidRequest(msg) => format!("Your video could not be built: {}", msg),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

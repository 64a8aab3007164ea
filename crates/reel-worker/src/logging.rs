//! Structured job logging utilities.
//!
//! Every render and pipeline run logs its lifecycle through a [`JobLogger`]
//! so the job ID, business ID and operation appear as fields on each event.

use tracing::{error, info, warn, Span};

use reel_models::JobId;

/// Job logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    business_id: String,
    operation: String,
}

impl JobLogger {
    /// Create a new job logger.
    ///
    /// # Arguments
    /// * `job_id` - The unique identifier for the render job
    /// * `business_id` - The business the video is produced for
    /// * `operation` - The type of operation (e.g., "render", "pipeline")
    pub fn new(job_id: &JobId, business_id: &str, operation: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            business_id: business_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            business_id = %self.business_id,
            operation = %self.operation,
            "Job started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            business_id = %self.business_id,
            operation = %self.operation,
            "Job progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            job_id = %self.job_id,
            business_id = %self.business_id,
            operation = %self.operation,
            "Job warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            job_id = %self.job_id,
            business_id = %self.business_id,
            operation = %self.operation,
            "Job error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            business_id = %self.business_id,
            operation = %self.operation,
            "Job completed: {}", message
        );
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn business_id(&self) -> &str {
        &self.business_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Create a tracing span for this job.
    ///
    /// Async work should be wrapped with `Instrument::instrument` rather than
    /// holding an entered guard across awaits.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "job",
            job_id = %self.job_id,
            business_id = %self.business_id,
            operation = %self.operation
        )
    }
}

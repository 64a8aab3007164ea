//! Prometheus metrics for the render pipeline.

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

use crate::error::{WorkerError, WorkerResult};

/// Metric names as constants for consistency.
pub mod names {
    // Render metrics
    pub const RENDER_SUBMISSIONS_TOTAL: &str = "reel_render_submissions_total";
    pub const RENDER_JOBS_TOTAL: &str = "reel_render_jobs_total";
    pub const RENDER_POLL_ATTEMPTS: &str = "reel_render_poll_attempts";
    pub const RENDER_POLL_ERRORS_TOTAL: &str = "reel_render_poll_errors_total";
    pub const RENDER_DURATION_SECONDS: &str = "reel_render_duration_seconds";
    pub const UPLOAD_BYTES: &str = "reel_upload_bytes";

    // Pipeline metrics
    pub const PIPELINE_OUTCOMES_TOTAL: &str = "reel_pipeline_outcomes_total";
    pub const VOICEOVER_UNAVAILABLE_TOTAL: &str = "reel_voiceover_unavailable_total";
}

/// Install the Prometheus recorder with an HTTP scrape listener on `addr`.
pub fn init_metrics(addr: &str) -> WorkerResult<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| WorkerError::config_error(format!("Invalid METRICS_ADDR '{}': {}", addr, e)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| {
            WorkerError::config_error(format!("Failed to install Prometheus exporter: {}", e))
        })?;

    info!("Prometheus metrics listening on {}", addr);
    Ok(())
}

/// Record a submission to the render backend.
pub fn record_submission(composition_id: &str, accepted: bool) {
    let labels = [
        ("composition", composition_id.to_string()),
        ("accepted", accepted.to_string()),
    ];
    counter!(names::RENDER_SUBMISSIONS_TOTAL, &labels).increment(1);
}

/// Record the terminal state of a render job.
pub fn record_render_outcome(style: &str, outcome: &str, attempts: u32, elapsed_secs: f64) {
    let labels = [("style", style.to_string()), ("outcome", outcome.to_string())];
    counter!(names::RENDER_JOBS_TOTAL, &labels).increment(1);
    histogram!(names::RENDER_POLL_ATTEMPTS, &labels).record(attempts as f64);
    histogram!(names::RENDER_DURATION_SECONDS, &labels).record(elapsed_secs);
}

/// Record a poll that failed at the transport level.
pub fn record_poll_error() {
    counter!(names::RENDER_POLL_ERRORS_TOTAL).increment(1);
}

/// Record the size of a finalized upload.
pub fn record_upload(style: &str, bytes: usize) {
    let labels = [("style", style.to_string())];
    histogram!(names::UPLOAD_BYTES, &labels).record(bytes as f64);
}

/// Record how a pipeline run ended ("rendered", "partial" or "failed").
pub fn record_pipeline_outcome(style: &str, outcome: &str) {
    let labels = [("style", style.to_string()), ("outcome", outcome.to_string())];
    counter!(names::PIPELINE_OUTCOMES_TOTAL, &labels).increment(1);
}

/// Record a run that continued without narration audio.
pub fn record_voiceover_unavailable() {
    counter!(names::VOICEOVER_UNAVAILABLE_TOTAL).increment(1);
}

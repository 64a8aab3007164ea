//! Render job orchestration.
//!
//! One render is: validate the composition, submit it, poll on a fixed
//! interval until the backend reports a terminal state, then copy the
//! finished file into the asset store. The whole render, submission
//! included, must fit in the request budget. Every poll reserves its HTTP
//! timeout before it starts, and all waiting goes through an injectable
//! [`Clock`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn, Instrument};

use reel_models::{Composition, JobHandle, RenderJob, RenderResult};
use reel_storage::{video_asset_key, AssetStore, VIDEO_CONTENT_TYPE};
use reel_timeline::{validate_composition, Timeline};

use crate::backend::{RenderBackend, RenderRequest};
use crate::clock::{Clock, TokioClock};
use crate::config::RenderConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::metrics;

/// Consecutive poll failures logged before suppression kicks in.
const MAX_LOGGED_POLL_FAILURES: u32 = 3;

/// Transport failures seen by one poll loop.
///
/// The first few in a row are logged; after that the loop stays quiet until
/// the backend answers again, then reports how many polls it missed.
#[derive(Debug, Default)]
struct PollFailures {
    consecutive: u32,
    total: u32,
    suppressed_from: Option<u32>,
    last_error: Option<String>,
}

impl PollFailures {
    /// Returns `true` if this failure should be logged.
    fn record(&mut self, attempt: u32, error: &WorkerError) -> bool {
        self.consecutive += 1;
        self.total += 1;
        self.last_error = Some(error.to_string());

        if self.consecutive <= MAX_LOGGED_POLL_FAILURES {
            return true;
        }
        if self.suppressed_from.is_none() {
            self.suppressed_from = Some(attempt);
            warn!(
                attempt,
                "Render backend still unreachable, suppressing poll errors until it answers"
            );
        }
        false
    }

    fn recover(&mut self, attempt: u32) {
        if let Some(from) = self.suppressed_from.take() {
            info!(
                attempt,
                suppressed_from = from,
                failures = self.consecutive,
                last_error = self.last_error.as_deref().unwrap_or_default(),
                "Render backend reachable again"
            );
        }
        self.consecutive = 0;
    }
}

/// Drives a single render from submission to a stored asset.
pub struct RenderOrchestrator {
    backend: Arc<dyn RenderBackend>,
    store: Arc<dyn AssetStore>,
    clock: Arc<dyn Clock>,
    config: RenderConfig,
}

impl RenderOrchestrator {
    pub fn new(
        backend: Arc<dyn RenderBackend>,
        store: Arc<dyn AssetStore>,
        config: RenderConfig,
    ) -> WorkerResult<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            store,
            clock: Arc::new(TokioClock::new()),
            config,
        })
    }

    /// Replace the wall clock (tests use a virtual one).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `composition` for `business_id` and return the stored asset.
    pub async fn render(
        &self,
        composition: &Composition,
        business_id: &str,
    ) -> WorkerResult<RenderResult> {
        let mut job = RenderJob::new();
        let logger = JobLogger::new(&job.id, business_id, "render");
        let span = logger.create_span();

        self.run(&mut job, &logger, composition, business_id)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        job: &mut RenderJob,
        logger: &JobLogger,
        composition: &Composition,
        business_id: &str,
    ) -> WorkerResult<RenderResult> {
        let style = composition.style.as_str();
        let started = self.clock.now();
        logger.log_start(&format!(
            "{} render with {} scenes",
            style,
            composition.scenes.len()
        ));

        // Reject bad identifiers before the backend does any work.
        video_asset_key(business_id, composition.style, Utc::now())?;

        let handle = match self.submit(composition).await {
            Ok(handle) => handle,
            Err(e) => {
                job.fail(e.to_string());
                logger.log_error(&format!("Submission failed: {}", e));
                return Err(e);
            }
        };
        job.start(handle);
        logger.log_progress(&format!("Submitted as {}", job.id));

        let outcome = self.poll_within_budget(job, started).await;
        let elapsed = self.clock.now().saturating_sub(started).as_secs_f64();
        metrics::record_render_outcome(style, job.state.as_str(), job.attempts, elapsed);

        let output_ref = match outcome {
            Ok(output_ref) => output_ref,
            Err(e) => {
                if e.is_timeout() {
                    logger.log_warning(&e.to_string());
                } else {
                    logger.log_error(&e.to_string());
                }
                return Err(e);
            }
        };

        let remaining = self
            .config
            .request_budget
            .saturating_sub(self.elapsed_since(started));
        let result = tokio::time::timeout(
            remaining,
            self.finalize(&output_ref, business_id, composition),
        )
        .await
        .unwrap_or_else(|_| {
            Err(WorkerError::store_transfer(
                "copying the render exceeded the request budget",
            ))
        })
        .inspect_err(|e| logger.log_error(&format!("Finalize failed: {}", e)))?;

        logger.log_completion(&format!(
            "{} after {} polls ({:.1}s)",
            result.asset_url, job.attempts, elapsed
        ));
        Ok(result)
    }

    /// Validate and submit a composition.
    ///
    /// Scene durations and brand colors are checked first, so invalid input
    /// never reaches the backend.
    pub async fn submit(&self, composition: &Composition) -> WorkerResult<JobHandle> {
        let timeline = validate_composition(composition, self.config.fps)?;
        self.submit_validated(composition, &timeline).await
    }

    async fn submit_validated(
        &self,
        composition: &Composition,
        timeline: &Timeline,
    ) -> WorkerResult<JobHandle> {
        let request = RenderRequest::new(composition, timeline, &self.config)?;
        debug!(
            composition = %request.composition_id,
            frames = timeline.total_frames(),
            fps = timeline.fps(),
            "Submitting render"
        );

        let result = self.backend.submit(&request).await;
        metrics::record_submission(&request.composition_id, result.is_ok());

        let handle = result?;
        info!(
            render_id = %handle.render_id,
            bucket = %handle.bucket_name,
            "Render accepted"
        );
        Ok(handle)
    }

    /// Poll a started job until it is done, fails, or runs out of attempts.
    ///
    /// Returns the backend's output reference. A transport error on one poll
    /// uses up that attempt; only a fatal flag from the backend ends the loop
    /// early. The request budget is counted from this call.
    pub async fn poll_until_done(&self, job: &mut RenderJob) -> WorkerResult<String> {
        let started = self.clock.now();
        self.poll_within_budget(job, started).await
    }

    /// Poll loop whose budget started at `started` on the orchestrator clock.
    ///
    /// A poll only begins if the interval plus the worst-case poll duration
    /// still fits, so the loop never outlives the budget.
    async fn poll_within_budget(
        &self,
        job: &mut RenderJob,
        started: Duration,
    ) -> WorkerResult<String> {
        let handle = job
            .handle
            .clone()
            .ok_or_else(|| WorkerError::invalid_request("render job was never submitted"))?;

        let interval = self.config.poll_interval;
        let poll_timeout = self.config.http_timeout;
        let mut failures = PollFailures::default();

        for attempt in 1..=self.config.max_poll_attempts {
            let elapsed = self.elapsed_since(started);
            if elapsed + interval + poll_timeout > self.config.request_budget {
                warn!(
                    attempt,
                    elapsed_secs = elapsed.as_secs(),
                    "Request budget exhausted before next poll"
                );
                break;
            }

            self.clock.sleep(interval).await;

            let polled = tokio::time::timeout(poll_timeout, self.backend.poll(&handle))
                .await
                .unwrap_or_else(|_| {
                    Err(WorkerError::poll_failed(format!(
                        "no answer within {:?}",
                        poll_timeout
                    )))
                });

            let status = match polled {
                Ok(status) => {
                    failures.recover(attempt);
                    status
                }
                Err(e) => {
                    let last_progress = job.progress;
                    job.record_poll(last_progress);
                    metrics::record_poll_error();
                    if failures.record(attempt, &e) {
                        warn!(attempt, error = %e, "Render poll failed");
                    }
                    continue;
                }
            };

            job.record_poll(status.overall_progress);

            if status.fatal_error_encountered {
                let message = status.error_message();
                job.fail(message.clone());
                return Err(WorkerError::RenderFailed(message));
            }

            if status.done {
                return match status.output_file {
                    Some(output_ref) => {
                        job.complete(output_ref.clone());
                        info!(attempt, "Render finished");
                        Ok(output_ref)
                    }
                    None => {
                        let message = "render finished without an output file";
                        job.fail(message);
                        Err(WorkerError::render_failed(message))
                    }
                };
            }

            debug!(attempt, progress = job.progress, "Render in progress");
        }

        job.time_out();
        if failures.total > 0 {
            warn!(
                poll_errors = failures.total,
                last_error = failures.last_error.as_deref().unwrap_or_default(),
                "Render timed out with failed polls"
            );
        }
        Err(WorkerError::RenderTimedOut {
            attempts: job.attempts,
            elapsed_secs: self.elapsed_since(started).as_secs(),
        })
    }

    fn elapsed_since(&self, started: Duration) -> Duration {
        self.clock.now().saturating_sub(started)
    }

    /// Copy a finished render into the asset store.
    ///
    /// The reported duration is the sum of the requested scene durations.
    pub async fn finalize(
        &self,
        output_ref: &str,
        business_id: &str,
        composition: &Composition,
    ) -> WorkerResult<RenderResult> {
        let key = video_asset_key(business_id, composition.style, Utc::now())?;

        let bytes = self.backend.fetch_output(output_ref).await?;
        let size = bytes.len();

        self.store
            .upload(&key, bytes, VIDEO_CONTENT_TYPE, true)
            .await?;
        metrics::record_upload(composition.style.as_str(), size);

        Ok(RenderResult {
            asset_url: self.store.public_url(&key),
            duration_s: composition.total_duration_s(),
            style: composition.style,
        })
    }
}

//! Render job orchestration and the promo video pipeline.
//!
//! This crate provides:
//! - The [`RenderBackend`] seam and an HTTP client for it
//! - A bounded submit/poll/finalize [`RenderOrchestrator`]
//! - The [`PipelineCoordinator`] tying script, voiceover and rendering together
//! - A Gemini-backed [`ScriptWriter`]
//! - Configuration, structured job logging and metrics

pub mod backend;
pub mod clock;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod gemini;
pub mod http_backend;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod pipeline;
pub mod preview;

#[cfg(test)]
mod testing;

pub use backend::{BackendErrorInfo, PollStatus, RenderBackend, RenderRequest};
pub use clock::{Clock, ManualClock, TokioClock};
pub use collaborators::{AssetRepository, LogAssetRepository, ScriptWriter, VoiceoverProvider};
pub use config::RenderConfig;
pub use error::{WorkerError, WorkerResult, GENERIC_FAILURE_MESSAGE};
pub use gemini::GeminiScriptWriter;
pub use http_backend::HttpRenderBackend;
pub use logging::JobLogger;
pub use orchestrator::RenderOrchestrator;
pub use pipeline::{build_composition, PipelineCoordinator};
pub use preview::sample_frames;

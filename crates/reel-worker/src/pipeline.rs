//! Promo video pipeline.
//!
//! Runs strictly in order: script, voiceover, composition, render, and
//! asset persistence. Voiceover is best effort. A missing backend or a
//! render timeout degrades to a partial result carrying the script.

use std::sync::Arc;

use tracing::{debug, info, warn, Instrument};

use reel_models::{Composition, JobId, PipelineOutcome, Script, VideoBrief};

use crate::collaborators::{AssetRepository, ScriptWriter, VoiceoverProvider};
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::metrics;
use crate::orchestrator::RenderOrchestrator;

/// Coordinates one brief from script to stored video.
pub struct PipelineCoordinator {
    script_writer: Arc<dyn ScriptWriter>,
    voiceover: Option<Arc<dyn VoiceoverProvider>>,
    orchestrator: Option<RenderOrchestrator>,
    assets: Arc<dyn AssetRepository>,
}

impl PipelineCoordinator {
    pub fn new(script_writer: Arc<dyn ScriptWriter>, assets: Arc<dyn AssetRepository>) -> Self {
        Self {
            script_writer,
            voiceover: None,
            orchestrator: None,
            assets,
        }
    }

    pub fn with_voiceover(mut self, provider: Arc<dyn VoiceoverProvider>) -> Self {
        self.voiceover = Some(provider);
        self
    }

    /// Enable rendering. Without an orchestrator every run is partial.
    pub fn with_orchestrator(mut self, orchestrator: RenderOrchestrator) -> Self {
        self.orchestrator = Some(orchestrator);
        self
    }

    pub fn has_render_backend(&self) -> bool {
        self.orchestrator.is_some()
    }

    /// Produce a video (or a partial result) for `brief`.
    pub async fn run(&self, brief: &VideoBrief) -> WorkerResult<PipelineOutcome> {
        let logger = JobLogger::new(&JobId::new(), &brief.business_id, "pipeline");
        let span = logger.create_span();

        let result = self.run_steps(brief, &logger).instrument(span).await;

        let style = brief.style.as_str();
        match &result {
            Ok(outcome) if outcome.is_partial() => {
                metrics::record_pipeline_outcome(style, "partial")
            }
            Ok(_) => metrics::record_pipeline_outcome(style, "rendered"),
            Err(e) => {
                logger.log_error(&e.to_string());
                metrics::record_pipeline_outcome(style, "failed");
            }
        }
        result
    }

    async fn run_steps(
        &self,
        brief: &VideoBrief,
        logger: &JobLogger,
    ) -> WorkerResult<PipelineOutcome> {
        logger.log_start(&format!("{} video about '{}'", brief.style, brief.topic));

        let script = self.script_writer.write_script(brief).await?;
        logger.log_progress(&format!(
            "Script ready: {} scenes, {:.1}s",
            script.scenes.len(),
            script.total_duration_s()
        ));

        let voiceover_url = match self.synthesize_voiceover(brief, &script).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, "Continuing without narration audio");
                metrics::record_voiceover_unavailable();
                None
            }
        };

        let Some(orchestrator) = &self.orchestrator else {
            info!("No render backend configured, returning script only");
            return Ok(PipelineOutcome::partial(script, voiceover_url));
        };

        let composition = build_composition(brief, &script, voiceover_url.clone());
        let result = match orchestrator.render(&composition, &brief.business_id).await {
            Ok(result) => result,
            Err(e) if e.is_timeout() => {
                logger.log_warning(&format!("{}, returning script only", e));
                return Ok(PipelineOutcome::partial(script, voiceover_url));
            }
            Err(e) => return Err(e),
        };

        self.assets
            .save_video_asset(&brief.business_id, &result)
            .await?;
        logger.log_completion(&result.asset_url);

        Ok(PipelineOutcome::rendered(result))
    }

    async fn synthesize_voiceover(
        &self,
        brief: &VideoBrief,
        script: &Script,
    ) -> WorkerResult<String> {
        let provider = self
            .voiceover
            .as_ref()
            .ok_or_else(|| WorkerError::synthesis_unavailable("no voiceover provider configured"))?;

        let narration = script.narration_text();
        if narration.is_empty() {
            return Err(WorkerError::synthesis_unavailable("script has no narration"));
        }

        debug!(chars = narration.len(), "Synthesizing voiceover");
        provider
            .synthesize(&brief.business_id, &narration)
            .await
            .map_err(|e| {
                if matches!(e, WorkerError::SynthesisUnavailable(_)) {
                    e
                } else {
                    WorkerError::synthesis_unavailable(e.to_string())
                }
            })
    }
}

/// Composition for a brief's script, carrying the brand, images, voiceover
/// and call to action.
pub fn build_composition(
    brief: &VideoBrief,
    script: &Script,
    voiceover_url: Option<String>,
) -> Composition {
    let mut composition =
        Composition::from_script(brief.style, script, brief.brand.clone(), &brief.business_name)
            .with_voiceover(voiceover_url);
    if let Some(slots) = &brief.image_slots {
        composition = composition.with_image_slots(slots.clone());
    }
    if let Some(cta) = brief.cta_text.as_deref().filter(|c| !c.trim().is_empty()) {
        composition = composition.with_cta_text(cta);
    }
    composition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::PollStatus;
    use crate::clock::ManualClock;
    use crate::config::RenderConfig;
    use crate::testing::{
        MemoryStore, RecordingRepository, ScriptedBackend, StaticScriptWriter, StaticVoiceover,
    };
    use reel_models::{BrandParams, ImageSlots, Scene, VideoStyle, DEFAULT_CTA_TEXT};

    const VOICEOVER_URL: &str = "https://audio.example.com/biz_1/voiceover.mp3";

    fn brief(style: VideoStyle) -> VideoBrief {
        VideoBrief {
            business_id: "biz_1".to_string(),
            business_name: "Acme Bakery".to_string(),
            style,
            topic: "Fresh sourdough".to_string(),
            talking_points: vec!["Baked daily".to_string()],
            brand: BrandParams::default(),
            image_slots: None,
            cta_text: Some("Order now".to_string()),
        }
    }

    fn script() -> Script {
        Script::new(vec![
            Scene::new("Fresh bread", "Baked this morning.", 2.0),
            Scene::new("Visit us", "Open every day.", 3.0),
        ])
    }

    fn orchestrator(backend: Arc<ScriptedBackend>) -> RenderOrchestrator {
        RenderOrchestrator::new(
            backend,
            Arc::new(MemoryStore::new("https://cdn.example.com")),
            RenderConfig::default(),
        )
        .unwrap()
        .with_clock(Arc::new(ManualClock::new()))
    }

    #[tokio::test]
    async fn test_no_backend_returns_partial() {
        let voiceover = Arc::new(StaticVoiceover::new(VOICEOVER_URL));
        let repo = Arc::new(RecordingRepository::default());
        let pipeline =
            PipelineCoordinator::new(Arc::new(StaticScriptWriter::new(script())), repo.clone())
                .with_voiceover(voiceover.clone());
        assert!(!pipeline.has_render_backend());

        let outcome = pipeline.run(&brief(VideoStyle::Promo)).await.unwrap();

        assert_eq!(
            outcome,
            PipelineOutcome::partial(script(), Some(VOICEOVER_URL.to_string()))
        );
        assert_eq!(voiceover.call_count(), 1);
        assert!(repo.saved().is_empty());
    }

    #[tokio::test]
    async fn test_rendered_outcome_is_persisted() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            PollStatus::in_progress(0.5),
            PollStatus::finished("https://render.example/out.mp4"),
        ]));
        let repo = Arc::new(RecordingRepository::default());
        let pipeline =
            PipelineCoordinator::new(Arc::new(StaticScriptWriter::new(script())), repo.clone())
                .with_voiceover(Arc::new(StaticVoiceover::new(VOICEOVER_URL)))
                .with_orchestrator(orchestrator(backend.clone()));

        let outcome = pipeline.run(&brief(VideoStyle::SocialClip)).await.unwrap();

        match outcome {
            PipelineOutcome::Rendered {
                url,
                duration_s,
                style,
            } => {
                assert!(url.starts_with("https://cdn.example.com/biz_1/social_clip/"));
                assert!((duration_s - 5.0).abs() < 1e-9);
                assert_eq!(style, VideoStyle::SocialClip);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let saved = repo.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "biz_1");

        let requests = backend.requests();
        assert_eq!(requests[0].composition_id, "SocialClip");
        assert_eq!(requests[0].input_props["voiceover_url"], VOICEOVER_URL);
        assert_eq!(requests[0].input_props["cta_text"], "Order now");
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_partial_with_voiceover() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let repo = Arc::new(RecordingRepository::default());
        let pipeline =
            PipelineCoordinator::new(Arc::new(StaticScriptWriter::new(script())), repo.clone())
                .with_voiceover(Arc::new(StaticVoiceover::new(VOICEOVER_URL)))
                .with_orchestrator(orchestrator(backend.clone()));

        let outcome = pipeline.run(&brief(VideoStyle::Promo)).await.unwrap();

        assert_eq!(
            outcome,
            PipelineOutcome::partial(script(), Some(VOICEOVER_URL.to_string()))
        );
        assert_eq!(backend.poll_count(), 120);
        assert!(repo.saved().is_empty());
    }

    #[tokio::test]
    async fn test_voiceover_failure_is_swallowed() {
        let backend = Arc::new(ScriptedBackend::new(vec![PollStatus::finished(
            "https://render.example/out.mp4",
        )]));
        let pipeline = PipelineCoordinator::new(
            Arc::new(StaticScriptWriter::new(script())),
            Arc::new(RecordingRepository::default()),
        )
        .with_voiceover(Arc::new(StaticVoiceover::failing()))
        .with_orchestrator(orchestrator(backend.clone()));

        let outcome = pipeline.run(&brief(VideoStyle::Promo)).await.unwrap();
        assert!(!outcome.is_partial());

        let props = &backend.requests()[0].input_props;
        assert!(props.get("voiceover_url").is_none());
    }

    #[tokio::test]
    async fn test_render_failure_surfaces_as_error() {
        let backend = Arc::new(ScriptedBackend::new(vec![PollStatus::fatal("encoder crashed")]));
        let pipeline = PipelineCoordinator::new(
            Arc::new(StaticScriptWriter::new(script())),
            Arc::new(RecordingRepository::default()),
        )
        .with_orchestrator(orchestrator(backend));

        let err = pipeline.run(&brief(VideoStyle::Promo)).await.unwrap_err();
        assert!(matches!(err, WorkerError::RenderFailed(_)));
    }

    #[tokio::test]
    async fn test_submission_rejection_surfaces_as_error() {
        let pipeline = PipelineCoordinator::new(
            Arc::new(StaticScriptWriter::new(script())),
            Arc::new(RecordingRepository::default()),
        )
        .with_orchestrator(orchestrator(Arc::new(ScriptedBackend::rejecting())));

        let err = pipeline.run(&brief(VideoStyle::Promo)).await.unwrap_err();
        assert!(matches!(err, WorkerError::SubmissionFailed(_)));
    }

    #[tokio::test]
    async fn test_script_and_persistence_failures_surface() {
        let pipeline = PipelineCoordinator::new(
            Arc::new(StaticScriptWriter::failing()),
            Arc::new(RecordingRepository::default()),
        );
        assert!(matches!(
            pipeline.run(&brief(VideoStyle::Promo)).await,
            Err(WorkerError::ScriptFailed(_))
        ));

        let backend = Arc::new(ScriptedBackend::new(vec![PollStatus::finished(
            "https://render.example/out.mp4",
        )]));
        let pipeline = PipelineCoordinator::new(
            Arc::new(StaticScriptWriter::new(script())),
            Arc::new(RecordingRepository::failing()),
        )
        .with_orchestrator(orchestrator(backend));
        assert!(matches!(
            pipeline.run(&brief(VideoStyle::Promo)).await,
            Err(WorkerError::PersistenceFailed(_))
        ));
    }

    #[test]
    fn test_build_composition_from_brief() {
        let mut b = brief(VideoStyle::Promo);
        b.cta_text = Some("  ".to_string());
        b.image_slots = Some(ImageSlots {
            hero: Some("https://img.example.com/hero.jpg".to_string()),
            middle: None,
            closing: None,
        });

        let composition = build_composition(&b, &script(), None);
        assert_eq!(composition.style, VideoStyle::Promo);
        assert_eq!(composition.business_name, "Acme Bakery");
        assert_eq!(composition.cta_text, DEFAULT_CTA_TEXT);
        assert!(composition.image_slots.is_some());
        assert!(composition.voiceover_url.is_none());
        assert_eq!(composition.scenes, script().scenes);
    }
}

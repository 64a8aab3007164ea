//! Services the pipeline depends on but does not own.

use async_trait::async_trait;
use tracing::info;

use reel_models::{RenderResult, Script, VideoBrief};

use crate::error::WorkerResult;

/// Produces the scene script for a brief.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    async fn write_script(&self, brief: &VideoBrief) -> WorkerResult<Script>;
}

/// Turns narration text into a hosted audio file.
#[async_trait]
pub trait VoiceoverProvider: Send + Sync {
    /// Returns the public URL of the synthesized audio.
    async fn synthesize(&self, business_id: &str, narration: &str) -> WorkerResult<String>;
}

/// Records finished assets against the business.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn save_video_asset(&self, business_id: &str, result: &RenderResult) -> WorkerResult<()>;
}

/// Repository that only logs the asset. Used by the CLI, which has no
/// business database to write to.
#[derive(Debug, Default)]
pub struct LogAssetRepository;

#[async_trait]
impl AssetRepository for LogAssetRepository {
    async fn save_video_asset(
        &self,
        business_id: &str,
        result: &RenderResult,
    ) -> WorkerResult<()> {
        info!(
            business_id,
            style = %result.style,
            url = %result.asset_url,
            duration_s = result.duration_s,
            "Video asset ready"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_models::VideoStyle;

    #[test]
    fn test_log_repository_accepts_assets() {
        let result = RenderResult {
            asset_url: "https://cdn.example.com/biz_1/promo/1.mp4".to_string(),
            duration_s: 25.0,
            style: VideoStyle::Promo,
        };
        let saved = tokio_test::block_on(LogAssetRepository.save_video_asset("biz_1", &result));
        assert!(saved.is_ok());
    }
}

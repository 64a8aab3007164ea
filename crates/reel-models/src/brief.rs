//! Pipeline input and output shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{BrandParams, ImageSlots, RenderResult, Script, VideoStyle};

/// Creative brief for one promotional video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoBrief {
    pub business_id: String,
    pub business_name: String,
    pub style: VideoStyle,
    pub topic: String,
    #[serde(default)]
    pub talking_points: Vec<String>,
    #[serde(default)]
    pub brand: BrandParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_slots: Option<ImageSlots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
}

/// What the pipeline hands back to its caller.
///
/// Serializes to `{url, duration_s, style}` on success and to
/// `{partial: true, script, voiceoverUrl}` when no video was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PipelineOutcome {
    Rendered {
        url: String,
        duration_s: f64,
        style: VideoStyle,
    },
    Partial {
        partial: bool,
        script: Script,
        #[serde(rename = "voiceoverUrl")]
        voiceover_url: Option<String>,
    },
}

impl PipelineOutcome {
    pub fn rendered(result: RenderResult) -> Self {
        Self::Rendered {
            url: result.asset_url,
            duration_s: result.duration_s,
            style: result.style,
        }
    }

    pub fn partial(script: Script, voiceover_url: Option<String>) -> Self {
        Self::Partial {
            partial: true,
            script,
            voiceover_url,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}

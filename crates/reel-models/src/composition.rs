//! Composition submitted for rendering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{BrandParams, ImageSlots, Scene, Script, VideoStyle};

/// CTA label used when the brief does not provide one.
pub const DEFAULT_CTA_TEXT: &str = "Get started today";

/// Scenes plus brand and style parameters, built once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Composition {
    /// Which skin renders the scenes
    pub style: VideoStyle,

    /// Ordered scenes, played back to back
    pub scenes: Vec<Scene>,

    /// Brand colors and fonts
    pub brand: BrandParams,

    /// Background imagery (promo only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_slots: Option<ImageSlots>,

    /// Voiceover audio track, if synthesis succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voiceover_url: Option<String>,

    /// Shown in the promo footer and the social watermark
    pub business_name: String,

    /// Label of the closing call to action
    #[serde(default = "default_cta_text")]
    pub cta_text: String,
}

fn default_cta_text() -> String {
    DEFAULT_CTA_TEXT.to_string()
}

impl Composition {
    /// Create a composition from a script.
    pub fn from_script(
        style: VideoStyle,
        script: &Script,
        brand: BrandParams,
        business_name: impl Into<String>,
    ) -> Self {
        Self {
            style,
            scenes: script.scenes.clone(),
            brand,
            image_slots: None,
            voiceover_url: None,
            business_name: business_name.into(),
            cta_text: default_cta_text(),
        }
    }

    pub fn with_image_slots(mut self, slots: ImageSlots) -> Self {
        self.image_slots = (!slots.is_empty()).then_some(slots);
        self
    }

    pub fn with_voiceover(mut self, url: Option<String>) -> Self {
        self.voiceover_url = url;
        self
    }

    pub fn with_cta_text(mut self, cta: impl Into<String>) -> Self {
        self.cta_text = cta.into();
        self
    }

    /// Sum of scene durations in seconds.
    ///
    /// This is the duration reported for the rendered asset.
    pub fn total_duration_s(&self) -> f64 {
        self.scenes.iter().map(|s| s.duration_s).sum()
    }
}

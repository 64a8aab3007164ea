//! Scenes and scripts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One timed segment of a composition.
///
/// Scenes are produced by the script writer and never edited afterwards;
/// styling happens in the composition skins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    /// On-screen headline text
    pub text: String,

    /// Voiceover narration for this scene
    #[serde(default)]
    pub narration: String,

    /// Scene length in seconds (must be > 0)
    pub duration_s: f64,

    /// Free-text visual cue (e.g. "storefront at dusk")
    #[serde(default)]
    pub visual: String,
}

impl Scene {
    pub fn new(text: impl Into<String>, narration: impl Into<String>, duration_s: f64) -> Self {
        Self {
            text: text.into(),
            narration: narration.into(),
            duration_s,
            visual: String::new(),
        }
    }

    /// Attach a visual cue.
    pub fn with_visual(mut self, visual: impl Into<String>) -> Self {
        self.visual = visual.into();
        self
    }
}

/// Script returned by the script writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Script {
    pub scenes: Vec<Scene>,
}

impl Script {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    /// Sum of all scene durations in seconds.
    pub fn total_duration_s(&self) -> f64 {
        self.scenes.iter().map(|s| s.duration_s).sum()
    }

    /// Narration for the whole script, one scene per paragraph.
    ///
    /// Scenes with empty narration are skipped.
    pub fn narration_text(&self) -> String {
        self.scenes
            .iter()
            .map(|s| s.narration.trim())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

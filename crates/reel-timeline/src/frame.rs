//! Per-frame visual state and the single evaluation entry point.

use serde::Serialize;

use reel_models::{Composition, Scene, VideoStyle};

use crate::error::{TimelineError, TimelineResult};
use crate::timeline::Timeline;
use crate::{promo, social};

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameState {
    /// Global frame index
    pub frame: u64,
    pub scene_index: usize,
    /// Frame index relative to the scene start
    pub local_frame: u64,
    pub width: u32,
    pub height: u32,
    pub background: Background,
    pub headline: TextLayer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<TextLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<TextLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<TextLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<CtaLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    Solid {
        color: String,
    },
    Image {
        url: String,
        overlay_color: String,
        overlay_opacity: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLayer {
    pub text: String,
    pub font_family: String,
    pub font_size_px: f64,
    pub color: String,
    /// Render with an all-caps text transform; `text` itself is untouched
    pub uppercase: bool,
    pub opacity: f64,
    /// Vertical offset in pixels, positive is down
    pub offset_y: f64,
    pub scale: f64,
}

impl TextLayer {
    pub fn new(
        text: impl Into<String>,
        font_family: impl Into<String>,
        font_size_px: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            font_family: font_family.into(),
            font_size_px,
            color: color.into(),
            uppercase: false,
            opacity: 1.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_offset(mut self, offset_y: f64) -> Self {
        self.offset_y = offset_y;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaShape {
    /// Full-width block under the headline (promo)
    Block,
    /// Rounded pill near the bottom edge (social)
    Pill,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CtaLayer {
    pub text: String,
    pub shape: CtaShape,
    pub font_family: String,
    pub font_size_px: f64,
    pub background_color: String,
    pub text_color: String,
    pub opacity: f64,
    pub scale: f64,
}

/// Inputs shared by both skins for one frame.
pub(crate) struct SceneContext<'a> {
    pub composition: &'a Composition,
    pub scene: &'a Scene,
    pub index: usize,
    pub scene_count: usize,
    pub local_frame: u64,
    pub total_frames: u64,
    pub fps: u32,
}

impl SceneContext<'_> {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.scene_count
    }

    pub fn local_frame_i64(&self) -> i64 {
        i64::try_from(self.local_frame).unwrap_or(i64::MAX)
    }
}

/// Layers produced by a skin, before frame metadata is attached.
pub(crate) struct SceneLayers {
    pub background: Background,
    pub headline: TextLayer,
    pub caption: Option<TextLayer>,
    pub footer: Option<TextLayer>,
    pub watermark: Option<TextLayer>,
    pub cta: Option<CtaLayer>,
}

/// Evaluate the visual state of global `frame`.
///
/// `timeline` must have been built from `composition`. The style flag on the
/// composition selects the skin; scene content is passed through unchanged.
pub fn evaluate_frame(
    composition: &Composition,
    timeline: &Timeline,
    frame: u64,
) -> TimelineResult<FrameState> {
    if timeline.scene_count() != composition.scenes.len() {
        return Err(TimelineError::invalid_scene(format!(
            "timeline has {} scenes but composition has {}",
            timeline.scene_count(),
            composition.scenes.len()
        )));
    }

    let (index, local_frame) = timeline.locate(frame)?;
    let ctx = SceneContext {
        composition,
        scene: &composition.scenes[index],
        index,
        scene_count: composition.scenes.len(),
        local_frame,
        total_frames: timeline.frame_counts()[index],
        fps: timeline.fps(),
    };

    let layers = match composition.style {
        VideoStyle::Promo => promo::skin(&ctx)?,
        VideoStyle::SocialClip => social::skin(&ctx)?,
    };
    let (width, height) = composition.style.canvas();

    Ok(FrameState {
        frame,
        scene_index: index,
        local_frame,
        width,
        height,
        background: layers.background,
        headline: layers.headline,
        caption: layers.caption,
        footer: layers.footer,
        watermark: layers.watermark,
        cta: layers.cta,
    })
}

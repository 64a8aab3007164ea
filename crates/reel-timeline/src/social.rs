//! Social clip skin: vertical, fast cuts, all-caps hook, watermark, CTA pill.

use crate::anim::{evaluate_opacity, evaluate_scale};
use crate::color::readable_on;
use crate::error::TimelineResult;
use crate::frame::{Background, CtaLayer, CtaShape, SceneContext, SceneLayers, TextLayer};

pub const FADE_IN_S: f64 = 0.15;
pub const FADE_OUT_S: f64 = 0.15;
pub const WATERMARK_OPACITY: f64 = 0.3;

const HOOK_SIZE_PX: f64 = 112.0;
const HEADLINE_SIZE_PX: f64 = 80.0;
const WATERMARK_SIZE_PX: f64 = 28.0;
const CTA_SIZE_PX: f64 = 44.0;

pub(crate) fn skin(ctx: &SceneContext<'_>) -> TimelineResult<SceneLayers> {
    let brand = &ctx.composition.brand;
    let local = ctx.local_frame_i64();

    let opacity = evaluate_opacity(local, ctx.total_frames, ctx.fps, FADE_IN_S, FADE_OUT_S)?;
    let pop = evaluate_scale(local, ctx.fps)?;

    // The hook scene sits on the opaque primary color.
    let background_color = if ctx.is_first() {
        &brand.primary_color
    } else {
        &brand.background_color
    };
    let text_color = readable_on(background_color, &brand.text_color)?;

    let size = if ctx.is_first() { HOOK_SIZE_PX } else { HEADLINE_SIZE_PX };
    let mut headline = TextLayer::new(
        ctx.scene.text.clone(),
        brand.heading_font.clone(),
        size,
        text_color.clone(),
    )
    .with_opacity(opacity)
    .with_scale(pop);
    if ctx.is_first() {
        headline = headline.uppercase();
    }

    let watermark = TextLayer::new(
        ctx.composition.business_name.clone(),
        brand.body_font.clone(),
        WATERMARK_SIZE_PX,
        text_color,
    )
    .with_opacity(WATERMARK_OPACITY);

    let cta = if ctx.is_last() {
        Some(CtaLayer {
            text: ctx.composition.cta_text.clone(),
            shape: CtaShape::Pill,
            font_family: brand.heading_font.clone(),
            font_size_px: CTA_SIZE_PX,
            background_color: brand.accent_color.clone(),
            text_color: readable_on(&brand.accent_color, &brand.text_color)?,
            opacity,
            scale: pop,
        })
    } else {
        None
    };

    Ok(SceneLayers {
        background: Background::Solid {
            color: background_color.clone(),
        },
        headline,
        caption: None,
        footer: None,
        watermark: Some(watermark),
        cta,
    })
}

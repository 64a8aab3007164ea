//! Promo skin: landscape, imagery on key scenes, captions, footer, CTA block.

use reel_models::ImageSlots;

use crate::anim::{evaluate_offset, evaluate_opacity, evaluate_scale};
use crate::color::readable_on;
use crate::error::TimelineResult;
use crate::frame::{Background, CtaLayer, CtaShape, SceneContext, SceneLayers, TextLayer};

pub const FADE_IN_S: f64 = 0.5;
pub const FADE_OUT_S: f64 = 0.5;
pub const CAPTION_MAX_CHARS: usize = 100;
pub const IMAGE_OVERLAY_OPACITY: f64 = 0.55;
pub const FOOTER_OPACITY: f64 = 0.8;

const HEADLINE_SIZE_PX: f64 = 72.0;
const CAPTION_SIZE_PX: f64 = 32.0;
const FOOTER_SIZE_PX: f64 = 24.0;
const CTA_SIZE_PX: f64 = 40.0;

/// Background image bound to a scene position.
///
/// First scene gets the hero image, last scene the closing image, and the
/// middle scene (`scene_count / 2`) the middle image. First wins over last
/// when there is a single scene; last wins over middle with two scenes.
pub fn background_image(
    slots: Option<&ImageSlots>,
    index: usize,
    scene_count: usize,
) -> Option<&str> {
    let slots = slots?;
    let slot = if index == 0 {
        &slots.hero
    } else if index + 1 == scene_count {
        &slots.closing
    } else if index == scene_count / 2 {
        &slots.middle
    } else {
        return None;
    };
    slot.as_deref()
}

/// Caption text for a narration line: at most 100 characters plus `...`.
///
/// Blank narration yields no caption.
pub fn caption_text(narration: &str) -> Option<String> {
    let narration = narration.trim();
    if narration.is_empty() {
        return None;
    }
    if narration.chars().count() <= CAPTION_MAX_CHARS {
        return Some(narration.to_string());
    }
    let head: String = narration.chars().take(CAPTION_MAX_CHARS).collect();
    Some(format!("{}...", head))
}

pub(crate) fn skin(ctx: &SceneContext<'_>) -> TimelineResult<SceneLayers> {
    let brand = &ctx.composition.brand;
    let local = ctx.local_frame_i64();

    let opacity = evaluate_opacity(local, ctx.total_frames, ctx.fps, FADE_IN_S, FADE_OUT_S)?;
    let offset = evaluate_offset(local, ctx.fps)?;

    // Text sits on the overlay when an image is shown, so contrast is
    // computed against the background color either way.
    let background = match background_image(
        ctx.composition.image_slots.as_ref(),
        ctx.index,
        ctx.scene_count,
    ) {
        Some(url) => Background::Image {
            url: url.to_string(),
            overlay_color: brand.background_color.clone(),
            overlay_opacity: IMAGE_OVERLAY_OPACITY,
        },
        None => Background::Solid {
            color: brand.background_color.clone(),
        },
    };
    let text_color = readable_on(&brand.background_color, &brand.text_color)?;

    let headline = TextLayer::new(
        ctx.scene.text.clone(),
        brand.heading_font.clone(),
        HEADLINE_SIZE_PX,
        text_color.clone(),
    )
    .with_opacity(opacity)
    .with_offset(offset);

    let caption = caption_text(&ctx.scene.narration).map(|text| {
        TextLayer::new(text, brand.body_font.clone(), CAPTION_SIZE_PX, text_color.clone())
            .with_opacity(opacity)
    });

    let footer = TextLayer::new(
        ctx.composition.business_name.clone(),
        brand.body_font.clone(),
        FOOTER_SIZE_PX,
        text_color,
    )
    .with_opacity(FOOTER_OPACITY);

    let cta = if ctx.is_last() {
        Some(CtaLayer {
            text: ctx.composition.cta_text.clone(),
            shape: CtaShape::Block,
            font_family: brand.heading_font.clone(),
            font_size_px: CTA_SIZE_PX,
            background_color: brand.accent_color.clone(),
            text_color: readable_on(&brand.accent_color, &brand.text_color)?,
            opacity,
            scale: evaluate_scale(local, ctx.fps)?,
        })
    } else {
        None
    };

    Ok(SceneLayers {
        background,
        headline,
        caption,
        footer: Some(footer),
        watermark: None,
        cta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::evaluate_frame;
    use crate::timeline::build_timeline;
    use reel_models::{BrandParams, Composition, Scene, Script, VideoStyle};

    fn slots() -> ImageSlots {
        ImageSlots {
            hero: Some("https://img.example.com/hero.jpg".to_string()),
            middle: Some("https://img.example.com/middle.jpg".to_string()),
            closing: Some("https://img.example.com/closing.jpg".to_string()),
        }
    }

    fn composition(scene_count: usize) -> Composition {
        let scenes = (0..scene_count)
            .map(|i| Scene::new(format!("Scene {}", i), format!("Narration {}", i), 2.0))
            .collect();
        Composition::from_script(
            VideoStyle::Promo,
            &Script::new(scenes),
            BrandParams::default(),
            "Acme Bakery",
        )
        .with_image_slots(slots())
        .with_cta_text("Order online")
    }

    #[test]
    fn test_background_image_positions() {
        let s = slots();
        assert_eq!(background_image(Some(&s), 0, 5), s.hero.as_deref());
        assert_eq!(background_image(Some(&s), 1, 5), None);
        assert_eq!(background_image(Some(&s), 2, 5), s.middle.as_deref());
        assert_eq!(background_image(Some(&s), 3, 5), None);
        assert_eq!(background_image(Some(&s), 4, 5), s.closing.as_deref());
        assert_eq!(background_image(Some(&s), 0, 1), s.hero.as_deref());
        assert_eq!(background_image(Some(&s), 1, 2), s.closing.as_deref());
        assert_eq!(background_image(None, 0, 3), None);
    }

    #[test]
    fn test_caption_truncation() {
        assert_eq!(caption_text("  "), None);
        assert_eq!(caption_text("Short line").as_deref(), Some("Short line"));

        let exact = "a".repeat(100);
        assert_eq!(caption_text(&exact).as_deref(), Some(exact.as_str()));

        let long = "b".repeat(140);
        let caption = caption_text(&long).unwrap();
        assert_eq!(caption, format!("{}...", "b".repeat(100)));
    }

    #[test]
    fn test_caption_truncation_counts_chars_not_bytes() {
        let long = "é".repeat(120);
        let caption = caption_text(&long).unwrap();
        assert_eq!(caption.chars().count(), 103);
    }

    #[test]
    fn test_footer_on_every_scene_and_cta_only_on_last() {
        let c = composition(4);
        let t = build_timeline(&c, 30).unwrap();
        for frame in (0..t.total_frames()).step_by(10) {
            let state = evaluate_frame(&c, &t, frame).unwrap();
            let footer = state.footer.as_ref().unwrap();
            assert_eq!(footer.text, "Acme Bakery");
            assert_eq!(footer.opacity, FOOTER_OPACITY);
            assert!(state.watermark.is_none());
            if state.scene_index == 3 {
                let cta = state.cta.as_ref().unwrap();
                assert_eq!(cta.shape, CtaShape::Block);
                assert_eq!(cta.text, "Order online");
            } else {
                assert!(state.cta.is_none());
            }
        }
    }

    #[test]
    fn test_imagery_on_first_middle_last() {
        let c = composition(5);
        let t = build_timeline(&c, 30).unwrap();
        let kinds: Vec<bool> = t
            .frame_offsets()
            .iter()
            .map(|&f| {
                matches!(
                    evaluate_frame(&c, &t, f).unwrap().background,
                    Background::Image { .. }
                )
            })
            .collect();
        assert_eq!(kinds, vec![true, false, true, false, true]);
    }

    #[test]
    fn test_headline_fades_and_slides() {
        let c = composition(2);
        let t = build_timeline(&c, 30).unwrap();
        let first = evaluate_frame(&c, &t, 0).unwrap();
        assert_eq!(first.headline.opacity, 0.0);
        assert_eq!(first.headline.offset_y, 30.0);

        let settled = evaluate_frame(&c, &t, 30).unwrap();
        assert_eq!(settled.headline.opacity, 1.0);
        assert_eq!(settled.headline.offset_y, 0.0);
        assert!(!settled.headline.uppercase);
    }
}

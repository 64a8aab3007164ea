//! Scene timeline model and frame evaluator.
//!
//! Everything in this crate is pure: a composition plus a frame rate maps
//! deterministically to per-frame visual state, with no I/O and no
//! dependency on a rendering technology. The same functions back the
//! `frames` preview command and the tests.
//!
//! - [`timeline`]: frame offsets for contiguous scenes
//! - [`anim`]: clamped animation curves (fade, slide-up, pop)
//! - [`color`]: hex parsing and contrast helpers
//! - [`frame`]: [`FrameState`] and the single [`evaluate_frame`] entry point
//! - [`promo`] / [`social`]: the two composition skins

pub mod anim;
pub mod color;
pub mod error;
pub mod frame;
pub mod promo;
pub mod social;
pub mod timeline;

pub use anim::{evaluate_offset, evaluate_opacity, evaluate_scale, interpolate_clamped};
pub use color::{is_light_color, readable_on, validate_brand, Rgb};
pub use error::{TimelineError, TimelineResult};
pub use frame::{evaluate_frame, Background, CtaLayer, CtaShape, FrameState, TextLayer};
pub use timeline::{build_timeline, validate_composition, Timeline, DEFAULT_FPS};

//! Shared data models for the PromoReel render pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Scenes and scripts produced by the script writer
//! - Brand parameters and image slots from the business record
//! - Video styles (the closed promo / social clip choice)
//! - Compositions submitted for rendering
//! - Render jobs, results, and pipeline outcomes

pub mod brand;
pub mod brief;
pub mod composition;
pub mod job;
pub mod scene;
pub mod style;

// Re-export common types
pub use brand::{BrandParams, ImageSlots};
pub use brief::{PipelineOutcome, VideoBrief};
pub use composition::{Composition, DEFAULT_CTA_TEXT};
pub use job::{JobHandle, JobId, RenderJob, RenderResult, RenderState};
pub use scene::{Scene, Script};
pub use style::{StyleParseError, VideoStyle};

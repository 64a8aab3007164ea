//! Persistent asset store for rendered videos.
//!
//! This crate provides:
//! - The [`AssetStore`] seam the render orchestrator uploads through
//! - An S3-compatible Cloudflare R2 implementation
//! - Collision-free asset keys (`business/style/timestamp.mp4`)

pub mod client;
pub mod error;
pub mod keys;
pub mod store;

pub use client::{R2Client, R2Config};
pub use error::{StorageError, StorageResult};
pub use keys::{video_asset_key, VIDEO_CONTENT_TYPE};
pub use store::AssetStore;

//! Video style definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Available composition styles.
///
/// Chosen by the caller and never derived from scene content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VideoStyle {
    /// Longer landscape promo with imagery, captions and a footer
    Promo,
    /// Short vertical fast-cut clip
    SocialClip,
}

impl VideoStyle {
    pub const ALL: &'static [VideoStyle] = &[VideoStyle::Promo, VideoStyle::SocialClip];

    /// Wire name, also used in storage paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStyle::Promo => "promo",
            VideoStyle::SocialClip => "social_clip",
        }
    }

    /// Composition id registered with the render backend.
    pub fn composition_id(&self) -> &'static str {
        match self {
            VideoStyle::Promo => "PromoVideo",
            VideoStyle::SocialClip => "SocialClip",
        }
    }

    /// Output canvas size in pixels (width, height).
    pub fn canvas(&self) -> (u32, u32) {
        match self {
            VideoStyle::Promo => (1920, 1080),
            VideoStyle::SocialClip => (1080, 1920),
        }
    }
}

impl fmt::Display for VideoStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "promo" => Ok(VideoStyle::Promo),
            "social_clip" => Ok(VideoStyle::SocialClip),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown video style: {0}")]
pub struct StyleParseError(String);

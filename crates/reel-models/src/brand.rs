//! Brand parameters taken from the business record.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Colors and fonts used to skin a composition.
///
/// Colors are hex strings (`#RGB` or `#RRGGBB`, leading `#` optional);
/// they are validated by the timeline layer before anything is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BrandParams {
    pub primary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub heading_font: String,
    pub body_font: String,
}

impl Default for BrandParams {
    fn default() -> Self {
        Self {
            primary_color: "#7B39FC".to_string(),
            accent_color: "#FFB800".to_string(),
            background_color: "#0F0F14".to_string(),
            text_color: "#FFFFFF".to_string(),
            heading_font: "Inter".to_string(),
            body_font: "Inter".to_string(),
        }
    }
}

impl BrandParams {
    /// All colors with their field names, in declaration order.
    pub fn colors(&self) -> [(&'static str, &str); 4] {
        [
            ("primary_color", self.primary_color.as_str()),
            ("accent_color", self.accent_color.as_str()),
            ("background_color", self.background_color.as_str()),
            ("text_color", self.text_color.as_str()),
        ]
    }
}

/// Optional background imagery for promo compositions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageSlots {
    /// Shown behind the first scene
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<String>,
    /// Shown behind the middle scene
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
    /// Shown behind the last scene
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing: Option<String>,
}

impl ImageSlots {
    pub fn is_empty(&self) -> bool {
        self.hero.is_none() && self.middle.is_none() && self.closing.is_none()
    }
}

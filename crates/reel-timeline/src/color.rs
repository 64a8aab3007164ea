//! Hex color parsing and contrast helpers.

use std::fmt;
use std::str::FromStr;

use reel_models::BrandParams;

use crate::error::{TimelineError, TimelineResult};

pub const LIGHT_TEXT: Rgb = Rgb { r: 0xFF, g: 0xFF, b: 0xFF };
pub const DARK_TEXT: Rgb = Rgb { r: 0x11, g: 0x11, b: 0x11 };

/// Luminance above which a color counts as light.
const LIGHT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#RGB` / `#RRGGBB`, with or without the leading `#`.
    pub fn parse_hex(input: &str) -> TimelineResult<Self> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TimelineError::invalid_color(format!("'{}' is not hex", input)));
        }

        let channel = |s: &str| u8::from_str_radix(s, 16);
        let parsed = match digits.len() {
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                (short(0), short(1), short(2))
            }
            6 => (channel(&digits[0..2]), channel(&digits[2..4]), channel(&digits[4..6])),
            n => {
                return Err(TimelineError::invalid_color(format!(
                    "'{}' has {} digits, expected 3 or 6",
                    input, n
                )))
            }
        };

        match parsed {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self { r, g, b }),
            _ => Err(TimelineError::invalid_color(format!("'{}' is not hex", input))),
        }
    }

    /// Relative luminance `0.299R + 0.587G + 0.114B`, normalized to `[0, 1]`.
    pub fn luminance(&self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)) / 255.0
    }

    pub fn is_light(&self) -> bool {
        self.luminance() > LIGHT_THRESHOLD
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Whether dark text is needed on top of `hex`.
pub fn is_light_color(hex: &str) -> TimelineResult<bool> {
    Ok(Rgb::parse_hex(hex)?.is_light())
}

/// Pick a foreground for `background`.
///
/// Returns `preferred` when it contrasts with the background, otherwise
/// near-black on light backgrounds and white on dark ones.
pub fn readable_on(background: &str, preferred: &str) -> TimelineResult<String> {
    let bg = Rgb::parse_hex(background)?;
    let fg = Rgb::parse_hex(preferred)?;
    let chosen = match (bg.is_light(), fg.is_light()) {
        (true, false) | (false, true) => fg,
        (true, true) => DARK_TEXT,
        (false, false) => LIGHT_TEXT,
    };
    Ok(chosen.to_hex())
}

/// Reject brand records with malformed colors.
pub fn validate_brand(brand: &BrandParams) -> TimelineResult<()> {
    for (field, value) in brand.colors() {
        Rgb::parse_hex(value)
            .map_err(|e| TimelineError::invalid_color(format!("{}: {}", field, e)))?;
    }
    Ok(())
}

//! Concrete colour values and their textual formats.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ColourError;

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Creates an opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b, a: 255 } }

    /// Parses `#RRGGBB` or `#RRGGBBAA`; the leading hash is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ColourError::InvalidHex`] if the input is not six or eight hex digits.
    pub fn from_hex(input: &str) -> Result<Self, ColourError> {
        let digits = input.trim().trim_start_matches('#');
        let invalid = || ColourError::InvalidHex(input.to_string());

        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |idx: usize| u8::from_str_radix(&digits[idx..idx + 2], 16).map_err(|_| invalid());

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if digits.len() == 8 { channel(6)? } else { 255 },
        })
    }

    /// Alpha as a fraction in `[0, 1]`.
    #[must_use]
    pub fn alpha_fraction(self) -> f64 { f64::from(self.a) / 255.0 }

    /// Returns a copy with the alpha channel replaced; `alpha` is clamped to `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn with_alpha(self, alpha: f64) -> Self {
        let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        Self { a: (alpha * 255.0).round() as u8, ..self }
    }

    /// `#rrggbb`
    #[must_use]
    pub fn hex(self) -> String { format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b) }

    /// `#rrggbbaa`
    #[must_use]
    pub fn hex_alpha(self) -> String { format!("{}{:02x}", self.hex(), self.a) }

    /// `rrggbb`
    #[must_use]
    pub fn hex_no_hash(self) -> String { format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b) }

    /// CSS `rgb(r,g,b)`
    #[must_use]
    pub fn css_rgb(self) -> String { format!("rgb({},{},{})", self.r, self.g, self.b) }

    /// CSS `rgba(r,g,b,a)` with a decimal alpha.
    #[must_use]
    pub fn css_rgba(self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, format_alpha(self.alpha_fraction()))
    }

    /// `r,g,b` as used by Hyprland style configs.
    #[must_use]
    pub fn rgb_decimal(self) -> String { format!("{},{},{}", self.r, self.g, self.b) }
}

/// Formats an alpha fraction with at most three decimals and no trailing zeros.
fn format_alpha(alpha: f64) -> String {
    let formatted = format!("{alpha:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() }
}

/// A palette entry: the normalised hex form plus its structured channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColourValue {
    hex: String,
    rgba: Rgba,
}

impl ColourValue {
    /// Builds a value from structured channels.
    #[must_use]
    pub fn from_rgba(rgba: Rgba) -> Self {
        let hex = if rgba.a == 255 { rgba.hex() } else { rgba.hex_alpha() };
        Self { hex, rgba }
    }

    /// Parses a hex colour string.
    ///
    /// # Errors
    ///
    /// Returns [`ColourError::InvalidHex`] for malformed input.
    pub fn parse(input: &str) -> Result<Self, ColourError> { Rgba::from_hex(input).map(Self::from_rgba) }

    /// The normalised hex form (`#rrggbb`, or `#rrggbbaa` when translucent).
    #[must_use]
    pub fn hex(&self) -> &str { &self.hex }

    /// The structured channels.
    #[must_use]
    pub const fn rgba(&self) -> Rgba { self.rgba }
}

impl TryFrom<String> for ColourValue {
    type Error = ColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<ColourValue> for String {
    fn from(value: ColourValue) -> Self { value.hex }
}

impl fmt::Display for ColourValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.hex) }
}

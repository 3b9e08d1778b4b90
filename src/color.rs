//! Color-space math: hex ↔ RGB ↔ HSL, lightness/saturation/hue adjustments,
//! and WCAG contrast enforcement.
//!
//! Everything here is pure. A [`Color`] is an 8-bit sRGB triple; parsing is
//! the only fallible step, so malformed input is rejected once, at the edge,
//! and every operation after that is total.
//!
//! HSL components are fractions in `[0, 1]` (hue included, so a half turn is
//! `0.5`, not `180.0`). Conversions back to 8-bit channels round to the
//! nearest integer, which keeps `hex → rgb → hsl → rgb → hex` within one unit
//! per channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid color format: {0:?} (expected #RGB or #RRGGBB)")]
    InvalidColorFormat(String),
}

/// WCAG AA minimum contrast for normal body text.
pub const WCAG_AA: f64 = 4.5;

/// An opaque 8-bit sRGB color.
///
/// Serializes as a lowercase `#rrggbb` string so theme files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue, saturation and lightness, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` / `#RRGGBB`, with or without the leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let (r, g, b) = hex_to_rgb(hex)?;
        Ok(Self::rgb(r, g, b))
    }

    pub fn to_hex(self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let (r, g, b) = hsl_to_rgb(hsl.h, hsl.s, hsl.l);
        Self::rgb(r, g, b)
    }

    /// `"r, g, b"`, the form CSS `rgba(var(--x-rgb), a)` expects.
    pub fn rgb_triplet(self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Parse a 3- or 6-digit hex color. The 3-digit form doubles each nibble.
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8), ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let invalid = || ColorError::InvalidColorFormat(hex.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    match digits.len() {
        3 => {
            let nibble = |i: usize| {
                u8::from_str_radix(&digits[i..=i], 16)
                    .map(|n| n * 17)
                    .map_err(|_| invalid())
            };
            Ok((nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => {
            let byte =
                |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
            Ok((byte(0)?, byte(2)?, byte(4)?))
        }
        _ => Err(invalid()),
    }
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let (r, g, b) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let delta = max - min;
    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    Hsl {
        h: (h / 6.0).rem_euclid(1.0),
        s,
        l,
    }
}

pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s == 0.0 {
        let v = to_channel(l);
        return (v, v, v);
    }

    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;

    (
        to_channel(hue_to_channel(m1, m2, h + 1.0 / 3.0)),
        to_channel(hue_to_channel(m1, m2, h)),
        to_channel(hue_to_channel(m1, m2, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

fn to_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

// =============================================================================
// Adjustments
// =============================================================================

/// Multiply HSL lightness by `factor`, clamped to `[0, 1]`.
pub fn adjust_lightness(color: Color, factor: f64) -> Color {
    let hsl = color.to_hsl();
    Color::from_hsl(Hsl {
        l: (hsl.l * factor).clamp(0.0, 1.0),
        ..hsl
    })
}

/// Multiply HSL saturation by `factor`, clamped to `[0, 1]`.
pub fn adjust_saturation(color: Color, factor: f64) -> Color {
    let hsl = color.to_hsl();
    Color::from_hsl(Hsl {
        s: (hsl.s * factor).clamp(0.0, 1.0),
        ..hsl
    })
}

fn rotate_hue(color: Color, turn: f64) -> Color {
    let hsl = color.to_hsl();
    Color::from_hsl(Hsl {
        h: (hsl.h + turn).rem_euclid(1.0),
        ..hsl
    })
}

/// Hue rotated by half a turn, same saturation and lightness.
pub fn complementary(color: Color) -> Color {
    rotate_hue(color, 0.5)
}

/// The two triadic partners, at +1/3 and +2/3 of a turn.
pub fn triadic(color: Color) -> [Color; 2] {
    [rotate_hue(color, 1.0 / 3.0), rotate_hue(color, 2.0 / 3.0)]
}

// =============================================================================
// Contrast
// =============================================================================

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance in `[0, 1]`.
pub fn relative_luminance(color: Color) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// WCAG contrast ratio in `[1, 21]`, symmetric in its arguments.
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Return `text` if it already reaches `min_ratio` against `background`;
/// otherwise pure white or pure black, whichever contrasts more (black on a tie).
pub fn ensure_contrast(text: Color, background: Color, min_ratio: f64) -> Color {
    if contrast_ratio(text, background) >= min_ratio {
        return text;
    }

    let white = contrast_ratio(Color::WHITE, background);
    let black = contrast_ratio(Color::BLACK, background);
    if white > black {
        Color::WHITE
    } else {
        Color::BLACK
    }
}

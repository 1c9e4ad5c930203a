//! Colors and the paint palette.
//!
//! Colors are stored the way the canvas was authored: 8-bit sRGB channels
//! written as `#rrggbb`. The raster works on normalized floats, see
//! [`Color::to_f32`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ColorError;

/// An opaque 8-bit RGB color.
///
/// Serializes as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let err = || ColorError { input: hex.to_string() };
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Normalized `[r, g, b]` in `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A named palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub name: &'static str,
    pub color: Color,
}

/// The eight paint colors offered by the color picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    swatches: [Swatch; 8],
}

impl Palette {
    /// Number of swatches.
    pub const LEN: usize = 8;

    pub const DEFAULT: Palette = Palette {
        swatches: [
            Swatch { name: "Pink", color: Color::rgb(0xff, 0x6b, 0x9d) },
            Swatch { name: "Teal", color: Color::rgb(0x4e, 0xcd, 0xc4) },
            Swatch { name: "Blue", color: Color::rgb(0x45, 0xb7, 0xd1) },
            Swatch { name: "Green", color: Color::rgb(0x96, 0xce, 0xb4) },
            Swatch { name: "Yellow", color: Color::rgb(0xfe, 0xca, 0x57) },
            Swatch { name: "Light Pink", color: Color::rgb(0xff, 0x9f, 0xf3) },
            Swatch { name: "Light Blue", color: Color::rgb(0x54, 0xa0, 0xff) },
            Swatch { name: "Purple", color: Color::rgb(0x5f, 0x27, 0xcd) },
        ],
    };

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn get(&self, index: usize) -> Option<Swatch> {
        self.swatches.get(index).copied()
    }

    /// Look a swatch up by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.swatches
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::DEFAULT
    }
}

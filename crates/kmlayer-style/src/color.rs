//! KML color values
//!
//! KML writes colors as `aabbggrr` hexadecimal: alpha first, then blue,
//! green, red. Internally everything is plain RGBA.

use serde::{Deserialize, Serialize};

/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorValue {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
    /// Alpha channel (0-255, 255 = fully opaque)
    pub a: u8,
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };

    /// White (#ffffff)
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a KML `<color>` value: `aabbggrr`, optionally prefixed with `#`.
    ///
    /// Six-digit values (`bbggrr`) are accepted as opaque, which is what
    /// several KML writers emit in practice.
    #[must_use]
    pub fn from_kml_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        };
        match hex.len() {
            8 => Some(Self {
                a: channel(0)?,
                b: channel(2)?,
                g: channel(4)?,
                r: channel(6)?,
            }),
            6 => Some(Self {
                b: channel(0)?,
                g: channel(2)?,
                r: channel(4)?,
                a: 255,
            }),
            _ => None,
        }
    }

    /// Convert back to KML `aabbggrr` notation.
    #[must_use]
    pub fn to_kml_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}{:02x}", self.a, self.b, self.g, self.r)
    }

    /// Hue of this color in degrees `[0, 360)`, as used to tint the default
    /// marker when an icon style only sets a color.
    ///
    /// Greys (no chroma) report a hue of 0.
    #[must_use]
    pub fn hue(&self) -> f32 {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;
        if chroma <= f32::EPSILON {
            return 0.0;
        }

        let sector = if (max - r).abs() <= f32::EPSILON {
            ((g - b) / chroma).rem_euclid(6.0)
        } else if (max - g).abs() <= f32::EPSILON {
            (b - r) / chroma + 2.0
        } else {
            (r - g) / chroma + 4.0
        };
        (sector * 60.0).rem_euclid(360.0)
    }

    /// Random color mode.
    ///
    /// Each non-zero color channel is replaced by a random value in
    /// `[0, channel)`; zero channels stay zero and alpha is kept, so the
    /// result always lies in the box spanned by black and the base color.
    #[must_use]
    pub fn randomized(&self) -> Self {
        self.randomized_with(&mut fastrand::Rng::new())
    }

    /// Random color mode with an explicit generator.
    #[must_use]
    pub fn randomized_with(&self, rng: &mut fastrand::Rng) -> Self {
        let mut channel = |value: u8| {
            if value == 0 {
                0
            } else {
                rng.u8(..value)
            }
        };
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::WHITE
    }
}

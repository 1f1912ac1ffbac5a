// File: crates/bars-core/src/palette.rs
// Summary: Colors, the fixed bar/series palettes, procedural overflow colors and color scales.

use std::collections::HashMap;
use std::fmt;

use crate::geometry::round_half_up;

/// Opaque RGB color; `a` is kept for renderers and defaults to 255.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_u24(rgb: u32) -> Self {
        Self::from_rgb(((rgb >> 16) & 0xff) as u8, ((rgb >> 8) & 0xff) as u8, (rgb & 0xff) as u8)
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let h = s.trim().trim_start_matches('#');
        match h.len() {
            6 => u32::from_str_radix(h, 16).ok().map(Self::from_u24),
            3 => {
                let v = u32::from_str_radix(h, 16).ok()?;
                let (r, g, b) = (((v >> 8) & 0xf) as u8, ((v >> 4) & 0xf) as u8, (v & 0xf) as u8);
                Some(Self::from_rgb(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel-wise RGB interpolation with `Math.round` rounding.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| -> u8 {
            let v = round_half_up(a as f64 + (b as f64 - a as f64) * t);
            v.clamp(0.0, 255.0) as u8
        };
        Color::from_rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Fixed palette used by the simple bar charts.
pub const BAR_PALETTE: [Color; 13] = [
    Color::from_u24(0x5687d1),
    Color::from_u24(0x7b615c),
    Color::from_u24(0xde783b),
    Color::from_u24(0x6ab975),
    Color::from_u24(0xa173d1),
    Color::from_u24(0xbbbbbb),
    Color::from_u24(0xffaa00),
    Color::from_u24(0xd1d173),
    Color::from_u24(0xb96a7e),
    Color::from_u24(0x028f5c),
    Color::from_u24(0x1c297c),
    Color::from_u24(0xff6666),
    Color::from_u24(0xb27600),
];

/// Series palette for up to three stacked layers.
pub const SERIES_PALETTE_SMALL: [Color; 3] = [
    Color::from_u24(0x98abc5),
    Color::from_u24(0x6b486b),
    Color::from_u24(0xff8c00),
];

/// Series palette for four to seven stacked layers.
pub const SERIES_PALETTE_MEDIUM: [Color; 7] = [
    Color::from_u24(0x5687d1),
    Color::from_u24(0x7b615c),
    Color::from_u24(0xde783b),
    Color::from_u24(0x6ab975),
    Color::from_u24(0xa173d1),
    Color::from_u24(0xbbbbbb),
    Color::from_u24(0xffaa00),
];

/// Deterministic color for an index: `floor(i / 1000 * 0xffffff)` as a 24-bit RGB value.
/// Indices of 1000 and above wrap around the 24-bit space.
pub fn generate_color(index: usize) -> Color {
    let raw = ((index as f64 / 1000.0) * 16_777_215.0).floor() as u64;
    Color::from_u24((raw % 0x100_0000) as u32)
}

/// Fill for bar `index` keyed by `key` in multiple-colors mode.
/// Indices beyond the fixed palette switch to `generate_color(index + 1)`.
pub fn bar_fill(colors: &mut OrdinalColors, index: usize, key: &str) -> Color {
    if index >= BAR_PALETTE.len() {
        return generate_color(index + 1);
    }
    colors.color(key)
}

/// Ordinal color scale with an implicit domain: each new key takes the next
/// palette entry, cycling when the palette is exhausted.
#[derive(Clone, Debug)]
pub struct OrdinalColors {
    range: Vec<Color>,
    index: HashMap<String, usize>,
}

impl OrdinalColors {
    pub fn new(range: &[Color]) -> Self {
        Self { range: range.to_vec(), index: HashMap::new() }
    }

    pub fn color(&mut self, key: &str) -> Color {
        if self.range.is_empty() {
            return Color::BLACK;
        }
        let next = self.index.len();
        let i = *self.index.entry(key.to_string()).or_insert(next);
        self.range[i % self.range.len()]
    }
}

/// Color assignment for stacked layers, chosen by series count.
#[derive(Clone, Debug, PartialEq)]
pub enum SeriesColors {
    Ordinal(Vec<Color>),
    /// Continuous interpolation over `[0, last_index]`.
    Linear { from: Color, to: Color, last_index: usize },
}

impl SeriesColors {
    pub fn for_series_count(n: usize) -> Self {
        if n <= 3 {
            SeriesColors::Ordinal(SERIES_PALETTE_SMALL.to_vec())
        } else if n <= 7 {
            SeriesColors::Ordinal(SERIES_PALETTE_MEDIUM.to_vec())
        } else {
            SeriesColors::Linear {
                from: SERIES_PALETTE_SMALL[0],
                to: SERIES_PALETTE_SMALL[2],
                last_index: n - 1,
            }
        }
    }

    pub fn color(&self, series_index: usize) -> Color {
        match self {
            SeriesColors::Ordinal(range) if range.is_empty() => Color::BLACK,
            SeriesColors::Ordinal(range) => range[series_index % range.len()],
            SeriesColors::Linear { from, to, last_index } => {
                let t = if *last_index == 0 { 0.0 } else { series_index as f64 / *last_index as f64 };
                from.lerp(*to, t)
            }
        }
    }
}

//! Glyph/char store: fixed bitmap images keyed by a byte, providing
//! width/height on demand (§4.5). Chars do not carry their own layout
//! cache — a container asks the glyph store for a char's size.
//!
//! The original's 128x64 LCD packs each digit into a 5x9 bitmap (see
//! `font.cpp`); most printable glyphs share that cell, with a handful of
//! narrower ones (`1`, `.`, `,`, `'`) and wider ones (`%`, `@`). We keep
//! those exact proportions as abstract layout units rather than literal
//! bitmap rows, since rasterization itself is out of scope (§1).

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const DEFAULT_WIDTH: u16 = 5;
pub const DEFAULT_HEIGHT: u16 = 9;
pub const SMALL_WIDTH: u16 = 3;
pub const SMALL_HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub width: u16,
    pub height: u16,
}

static NARROW: Lazy<HashMap<u8, u16>> = Lazy::new(|| {
    [(b'1', 3), (b'.', 2), (b',', 2), (b'\'', 2), (b'i', 2), (b':', 2)]
        .into_iter()
        .collect()
});

static WIDE: Lazy<HashMap<u8, u16>> = Lazy::new(|| [(b'%', 7), (b'@', 8), (b'm', 7), (b'w', 7)].into_iter().collect());

/// Width/height of a glyph at normal font size.
pub fn glyph(byte: u8) -> GlyphMetrics {
    let width = NARROW
        .get(&byte)
        .copied()
        .or_else(|| WIDE.get(&byte).copied())
        .unwrap_or(DEFAULT_WIDTH);
    GlyphMetrics { width, height: DEFAULT_HEIGHT }
}

/// Width/height of a glyph rendered in small-font mode (used for exponents,
/// subscripts, matrix subscripts, etc. in the original firmware).
pub fn small_glyph(byte: u8) -> GlyphMetrics {
    let big = glyph(byte);
    let width = (big.width * SMALL_WIDTH + DEFAULT_WIDTH - 1) / DEFAULT_WIDTH;
    GlyphMetrics { width: width.max(1), height: SMALL_HEIGHT }
}

/// Width of a string: sum of glyph widths plus `(n-1)` spacing, per §4.5.
pub fn string_width(s: &[u8], spacing: u16, small: bool) -> u16 {
    if s.is_empty() {
        return 0;
    }
    let sum: u32 = s
        .iter()
        .map(|&b| if small { small_glyph(b).width } else { glyph(b).width } as u32)
        .sum();
    sum as u16 + spacing * (s.len() as u16 - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
    Center,
}

/// Computes the x offset to apply to a pre-measured string of `width` so
/// that it lands within `[0, avail)` per the requested alignment.
pub fn align_offset(width: u16, avail: u16, align: HAlign) -> u16 {
    match align {
        HAlign::Left => 0,
        HAlign::Right => avail.saturating_sub(width),
        HAlign::Center => avail.saturating_sub(width) / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_is_default_cell() {
        let g = glyph(b'0');
        assert_eq!(g, GlyphMetrics { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT });
    }

    #[test]
    fn one_is_narrow() {
        assert_eq!(glyph(b'1').width, 3);
    }

    #[test]
    fn string_width_sums_plus_spacing() {
        let w = string_width(b"00", 1, false);
        assert_eq!(w, DEFAULT_WIDTH * 2 + 1);
    }
}

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Fonts and text measurement
//!
//! Rendering glyphs is the job of the [`Backend`](crate::backend::Backend);
//! the popup engine only needs to *measure* text. This is abstracted by
//! [`TextMetrics`].

use crate::cast::Cast;
use unicode_segmentation::UnicodeSegmentation;

/// Font style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
    Fixed,
    FixedBold,
    Times,
    TimesBold,
}

/// A font: style plus size in points
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    pub style: FontStyle,
    pub size: u16,
}

impl Font {
    /// The default entry size
    pub const NORMAL_SIZE: u16 = 12;

    /// Construct
    #[inline]
    pub const fn new(style: FontStyle, size: u16) -> Self {
        Font { style, size }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new(FontStyle::Normal, Font::NORMAL_SIZE)
    }
}

/// Text measurement
///
/// All results are in pixels.
pub trait TextMetrics {
    /// Width of `text` when drawn in `font`
    fn text_width(&self, font: Font, text: &str) -> i32;

    /// Distance from the baseline to the top of the tallest glyph
    fn ascent(&self, font: Font) -> i32;

    /// Distance from the baseline to the bottom of the lowest glyph
    fn descent(&self, font: Font) -> i32;

    /// Height of one line of text
    fn line_height(&self, font: Font) -> i32 {
        self.ascent(font) + self.descent(font)
    }
}

/// Fixed-advance metrics
///
/// Every grapheme cluster is `(3 * size + 4) / 5` pixels wide (8 pixels at
/// size 12); ascent equals the size and descent is a quarter of it (rounded
/// up). Styles do not affect measurement. This is used by the headless
/// backend so that layout is deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedMetrics;

impl FixedMetrics {
    /// Advance of a single grapheme
    pub fn advance(font: Font) -> i32 {
        let size: i32 = font.size.cast();
        ((3 * size + 4) / 5).max(1)
    }
}

impl TextMetrics for FixedMetrics {
    fn text_width(&self, font: Font, text: &str) -> i32 {
        let n: i32 = text.graphemes(true).count().cast();
        n * Self::advance(font)
    }

    fn ascent(&self, font: Font) -> i32 {
        font.size.cast()
    }

    fn descent(&self, font: Font) -> i32 {
        let size: i32 = font.size.cast();
        (size + 3) / 4
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_metrics() {
        let font = Font::default();
        assert_eq!(FixedMetrics::advance(font), 8);
        assert_eq!(FixedMetrics.text_width(font, "Open"), 32);
        assert_eq!(FixedMetrics.text_width(font, ""), 0);
        // combining accent forms a single grapheme
        assert_eq!(FixedMetrics.text_width(font, "e\u{301}"), 8);
        assert_eq!(FixedMetrics.line_height(font), 15);
    }
}

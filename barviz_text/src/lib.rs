// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement for chart labels.
//!
//! Charts need text extents in two places: sizing tooltip boxes around their
//! label/value lines, and wrapping long axis tick labels into the left margin.
//! A browser answers both with `getBBox`/`getComputedTextLength`; here the
//! chart code depends on the small [`TextMeasurer`] interface instead, so a
//! shaping engine, a canvas bridge, or the built-in heuristic can be plugged in.

#![no_std]

extern crate alloc;

mod wrap;

use alloc::sync::Arc;

pub use wrap::wrap_words;

/// A minimal text measurement interface.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as one line; callers split lines themselves.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Arc<T> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

/// Text styling inputs relevant to measurement.
///
/// Chart text is always the stylesheet's sans-serif face, so only the size
/// takes part in measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in the chart's coordinate system (pixels).
    ///
    /// This is also the size of one `em` for `dx`/`dy` offsets.
    pub font_size: f64,
}

impl TextStyle {
    /// Creates a `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self { font_size }
    }

    /// Converts a length in `em` units into pixels for this style.
    #[must_use]
    pub fn em(&self, ems: f64) -> f64 {
        ems * self.font_size
    }
}

impl Default for TextStyle {
    /// The browser default for SVG axis text: 10px sans-serif.
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width, comparable to `getComputedTextLength`.
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// A heuristic measurer for hosts without a text engine.
///
/// It assumes an average glyph width of 0.6em, a space of 0.3em, and a
/// baseline at 0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let ems: f64 = text
            .chars()
            .map(|c| if c == ' ' { 0.3 } else { 0.6 })
            .sum();
        TextMetrics {
            advance_width: ems * style.font_size,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
        }
    }
}

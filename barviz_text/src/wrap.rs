// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy word wrapping.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::{TextMeasurer, TextStyle};

/// Splits `text` into lines no wider than `max_width`.
///
/// Words are separated by whitespace runs and rejoined with single spaces.
/// Words are appended to the current line while its measured width stays
/// within `max_width`; the word that overflows starts the next line. A word
/// that is wider than `max_width` on its own still gets a line, so no empty
/// lines are produced.
///
/// Returns an empty list for blank input.
pub fn wrap_words(
    text: &str,
    max_width: f64,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let checkpoint = line.len();
        line.push(' ');
        line.push_str(word);
        if measurer.measure(&line, style).advance_width > max_width {
            line.truncate(checkpoint);
            lines.push(core::mem::take(&mut line));
            line.push_str(word);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

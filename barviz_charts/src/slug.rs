// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class-name slugs.

extern crate alloc;

use alloc::string::String;

/// Turns a label into a CSS-class-safe token.
///
/// The label is lowercased, runs of whitespace and hyphens collapse into one
/// `-`, every other character outside `[a-z0-9_]` is dropped, and no hyphen is
/// left at either end. Different labels may produce the same slug.
pub fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_hyphen = false;
    for c in label.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
            continue;
        }
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            continue;
        }
        if pending_hyphen && !out.is_empty() {
            out.push('-');
        }
        pending_hyphen = false;
        out.push(c);
    }
    out
}

// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for tick labels and tooltips.

extern crate alloc;

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Returns the number of decimals needed to tell ticks `step` apart.
pub(crate) fn precision_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let p = -(step.log10() + 0.01).floor();
    if p <= 0.0 {
        0
    } else {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "positive and bounded by the f64 exponent range"
        )]
        {
            p as usize
        }
    }
}

/// Formats a tick value with grouped thousands and the precision implied by
/// `step`.
///
/// `format_tick_with_step(12000.0, 2000.0)` is `"12,000"` and
/// `format_tick_with_step(0.5, 0.1)` is `"0.5"`.
pub fn format_tick_with_step(value: f64, step: f64) -> String {
    let precision = precision_for_step(step);
    group_thousands(&format!("{value:.precision$}"))
}

/// Formats a datum value the way it reads in a tooltip: integers without a
/// fractional part, other values with the shortest exact representation.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return String::from("0");
    }
    format!("{value}")
}

fn group_thousands(number: &str) -> String {
    let (sign, rest) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int, frac) = match rest.find('.') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    if int.len() <= 3 || !int.bytes().all(|b| b.is_ascii_digit()) {
        return String::from(number);
    }

    let mut out = String::with_capacity(number.len() + int.len() / 3);
    out.push_str(sign);
    let lead = int.len() % 3;
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(frac);
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn precision_follows_step_magnitude() {
        assert_eq!(precision_for_step(2000.0), 0);
        assert_eq!(precision_for_step(1.0), 0);
        assert_eq!(precision_for_step(0.5), 1);
        assert_eq!(precision_for_step(0.1), 1);
        assert_eq!(precision_for_step(0.02), 2);
    }

    #[test]
    fn ticks_group_thousands() {
        assert_eq!(format_tick_with_step(0.0, 2000.0), "0");
        assert_eq!(format_tick_with_step(12000.0, 2000.0), "12,000");
        assert_eq!(format_tick_with_step(1_234_567.0, 1000.0), "1,234,567");
        assert_eq!(format_tick_with_step(-4500.0, 500.0), "-4,500");
        assert_eq!(format_tick_with_step(2500.5, 0.5), "2,500.5");
        assert_eq!(format_tick_with_step(0.30000000000000004, 0.1), "0.3");
    }

    #[test]
    fn values_drop_trailing_zero() {
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(-0.0), "0");
    }
}

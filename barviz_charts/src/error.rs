// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart errors.

extern crate alloc;

use alloc::string::String;

use thiserror::Error;

/// Errors reported while building a chart.
///
/// Rendering validates everything up front, so a failed render leaves the
/// container untouched.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ChartError {
    /// The data sequence was empty.
    #[error("no data to chart")]
    EmptyData,
    /// The container width was zero, negative, or not finite.
    #[error("container width must be a positive finite number of pixels, got {width}")]
    InvalidContainerWidth {
        /// The rejected width.
        width: f64,
    },
    /// The aspect ratio was zero, negative, or not finite.
    #[error("aspect ratio must be positive and finite, got {ratio}")]
    InvalidAspectRatio {
        /// The rejected ratio.
        ratio: f64,
    },
    /// The margins consume the whole drawing area.
    #[error("margins leave no plot area (inner size {inner_width}x{inner_height})")]
    DegenerateGeometry {
        /// Inner width after subtracting margins.
        inner_width: f64,
        /// Inner height after subtracting margins.
        inner_height: f64,
    },
    /// A bar or segment value was negative or not finite.
    #[error("value for {label:?} must be finite and non-negative, got {value}")]
    InvalidValue {
        /// Label of the offending bar or segment.
        label: String,
        /// The rejected value.
        value: f64,
    },
    /// Two data points share a label.
    #[error("duplicate label {label:?}")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },
    /// A stacked row's total disagrees with the sum of its segments.
    #[error("stacked row {label:?} has total {total} but its segments sum to {sum}")]
    InvalidStackedTotal {
        /// Row label.
        label: String,
        /// The stored total.
        total: f64,
        /// Sum of the row's segment values.
        sum: f64,
    },
}

/// Result alias for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart input rows.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Label of the synthetic total carried by every [`StackedRow`].
pub const TOTAL_LABEL: &str = "Total";

/// A datum that can be drawn as one bar.
pub trait BarDatum {
    /// Category label; also the band-scale key.
    fn label(&self) -> &str;

    /// Bar length in data units.
    fn value(&self) -> f64;

    /// Checks that the datum can be drawn.
    fn validate(&self) -> ChartResult<()> {
        check_value(self.label(), self.value())
    }
}

/// One labelled value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Category label.
    pub label: String,
    /// Bar length.
    pub value: f64,
}

impl DataPoint {
    /// Creates a data point.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl BarDatum for DataPoint {
    fn label(&self) -> &str {
        &self.label
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// A row of a stacked bar chart.
///
/// The serialized form is flat: `label`, `total`, and one entry per segment key.
///
/// ```json
/// { "label": "Theft", "total": { "label": "Total", "value": 7 },
///   "Class A": { "label": "Class A", "value": 3 },
///   "Class B": { "label": "Class B", "value": 4 } }
/// ```
///
/// A missing `total` deserializes as zero; call [`StackedRow::compute_total`]
/// before rendering such rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackedRow {
    /// Category label.
    pub label: String,
    /// Sum of all segment values, labelled [`TOTAL_LABEL`].
    #[serde(default = "zero_total")]
    pub total: DataPoint,
    /// Segments by key.
    #[serde(flatten)]
    pub segments: BTreeMap<String, DataPoint>,
}

fn zero_total() -> DataPoint {
    DataPoint::new(TOTAL_LABEL, 0.0)
}

impl StackedRow {
    /// Creates a row from `(key, value)` pairs, using each key as the segment label.
    pub fn new<K: Into<String>>(
        label: impl Into<String>,
        segments: impl IntoIterator<Item = (K, f64)>,
    ) -> Self {
        let segments = segments
            .into_iter()
            .map(|(key, value)| {
                let key = key.into();
                let point = DataPoint::new(key.clone(), value);
                (key, point)
            })
            .collect();
        let mut row = Self {
            label: label.into(),
            total: zero_total(),
            segments,
        };
        row.compute_total();
        row
    }

    /// Inserts or replaces a segment and refreshes the total.
    pub fn with_segment(mut self, key: impl Into<String>, segment: DataPoint) -> Self {
        self.segments.insert(key.into(), segment);
        self.compute_total();
        self
    }

    /// Returns the sum of all segment values.
    pub fn segment_sum(&self) -> f64 {
        self.segments.values().map(|s| s.value).sum()
    }

    /// Sets `total` to the segment sum and returns it.
    pub fn compute_total(&mut self) -> f64 {
        let sum = self.segment_sum();
        self.total = DataPoint::new(TOTAL_LABEL, sum);
        sum
    }

    /// Returns the segments named by `keys`, in that order, with their
    /// cumulative extents.
    ///
    /// Keys missing from the row are skipped, so the next present key starts
    /// where the previous present one ended.
    pub fn segments_in<S: AsRef<str>>(&self, keys: &[S]) -> Vec<Segment> {
        let mut x = 0.0;
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            let Some(point) = self.segments.get(key) else {
                continue;
            };
            let x0 = x;
            x += point.value;
            out.push(Segment {
                key: String::from(key),
                label: point.label.clone(),
                value: point.value,
                x0,
                x1: x,
            });
        }
        out
    }
}

impl BarDatum for StackedRow {
    fn label(&self) -> &str {
        &self.label
    }

    fn value(&self) -> f64 {
        self.total.value
    }

    fn validate(&self) -> ChartResult<()> {
        for segment in self.segments.values() {
            check_value(&segment.label, segment.value)?;
        }
        check_value(&self.label, self.total.value)?;
        let sum = self.segment_sum();
        let tolerance = 1e-9 * sum.abs().max(1.0);
        if (self.total.value - sum).abs() > tolerance {
            return Err(ChartError::InvalidStackedTotal {
                label: self.label.clone(),
                total: self.total.value,
                sum,
            });
        }
        Ok(())
    }
}

/// One drawn piece of a stacked bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Segment key (the stacking key).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Segment length.
    pub value: f64,
    /// Cumulative start along the value axis.
    pub x0: f64,
    /// Cumulative end along the value axis.
    pub x1: f64,
}

fn check_value(label: &str, value: f64) -> ChartResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidValue {
            label: String::from(label),
            value,
        })
    }
}

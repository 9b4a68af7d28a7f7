// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales: mapping data values and labels into plot coordinates.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// A degenerate domain (`d0 == d1`) maps everything to the start of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns round tick values inside the domain, about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let step = self.tick_step(count);
        if step == 0.0 {
            let (d0, d1) = self.domain;
            return if d0 == d1 && d0.is_finite() {
                alloc::vec![d0]
            } else {
                Vec::new()
            };
        }
        let (min, max) = self.extent();
        let start = (min / step).ceil() * step;
        let stop = (max / step).floor() * step + step * 0.5;

        let n_f = ((stop - start) / step).floor();
        let n = if n_f.is_finite() && n_f >= 0.0 {
            let n_f = n_f.min(10_000.0);
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "guarded by finite/non-negative checks and capped at 10k"
            )]
            {
                n_f as u64
            }
        } else {
            return Vec::new();
        };
        (0..=n).map(|i| start + step * i as f64).collect()
    }

    /// Returns the spacing between the values produced by [`Self::ticks`].
    ///
    /// Returns `0.0` for an empty or non-finite domain.
    pub fn tick_step(&self, count: usize) -> f64 {
        let (min, max) = self.extent();
        let span = max - min;
        if count == 0 || !span.is_finite() || span <= 0.0 {
            return 0.0;
        }
        nice_step(span, count)
    }

    fn extent(&self) -> (f64, f64) {
        let (d0, d1) = self.domain;
        if d0 <= d1 { (d0, d1) } else { (d1, d0) }
    }
}

/// Picks a step of 1, 2, 5 or 10 times a power of ten so that `span` splits
/// into roughly `count` intervals.
fn nice_step(span: f64, count: usize) -> f64 {
    let m = count as f64;
    let mut step = 10_f64.powi(exponent((span / m).log10().floor()));
    let err = m / span * step;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    step
}

fn exponent(e: f64) -> i32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "clamped to the f64 exponent range"
    )]
    {
        e.clamp(-330.0, 330.0) as i32
    }
}

/// A discrete band scale that lays labels out as evenly spaced bands.
///
/// Positions snap to whole pixels by default: the step is floored, the band
/// width is rounded, and the leftover space is split evenly before the first
/// and after the last band. A range given high-to-low (`(h, 0)`) lists the
/// first label at the high end.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBand {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    round: bool,
}

impl ScaleBand {
    /// Creates a rounded band scale over `labels` with 10% inner and outer
    /// padding.
    ///
    /// Later duplicates of a label share the first one's band.
    pub fn new<I, S>(labels: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            index.entry(label.clone()).or_insert(i);
        }
        Self {
            labels,
            index,
            range,
            padding_inner: 0.1,
            padding_outer: 0.1,
            round: true,
        }
    }

    /// Sets inner and outer padding in step units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Enables or disables pixel snapping.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Returns the labels in domain order.
    pub fn domain(&self) -> &[String] {
        &self.labels
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.labels.len()
    }

    /// Returns the domain index of `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Returns the distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.layout().1
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        self.layout().2
    }

    /// Returns the start of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (start, step, _) = self.layout();
        let n = self.count();
        let slot = if self.reversed() {
            n.saturating_sub(1).saturating_sub(index)
        } else {
            index
        };
        start + step * slot as f64
    }

    /// Returns the start of the band for `label`, or `None` for unknown labels.
    pub fn map(&self, label: &str) -> Option<f64> {
        self.index_of(label).map(|i| self.x(i))
    }

    /// Returns the center of the band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + self.band_width() * 0.5
    }

    fn reversed(&self) -> bool {
        self.range.1 < self.range.0
    }

    /// Returns `(first band start, step, band width)` in ascending coordinates.
    fn layout(&self) -> (f64, f64, f64) {
        let n = self.count() as f64;
        if n == 0.0 {
            return (self.range.0.min(self.range.1), 0.0, 0.0);
        }
        let (lo, hi) = if self.reversed() {
            (self.range.1, self.range.0)
        } else {
            self.range
        };
        let denom = n - self.padding_inner + 2.0 * self.padding_outer;
        if denom <= 0.0 {
            return (lo, 0.0, 0.0);
        }
        let span = hi - lo;
        if self.round {
            let step = (span / denom).floor();
            let leftover = span - (n - self.padding_inner) * step;
            let start = lo + (leftover / 2.0).round();
            (start, step, (step * (1.0 - self.padding_inner)).round())
        } else {
            let step = span / denom;
            let start = lo + step * self.padding_outer;
            (start, step, step * (1.0 - self.padding_inner))
        }
    }
}

/// Returns `[0, max]` where `max` is the largest finite value, or `0.0`.
pub fn zero_based_domain(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    (0.0, max)
}

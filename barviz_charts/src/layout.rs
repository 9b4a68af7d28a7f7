// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plot geometry and the per-render layout context.
//!
//! A render pass turns a container width into a [`Geometry`] (margins plus the
//! inner plot size), then asks the chart's [`ScaleStrategy`] for a band scale
//! over the labels and a linear scale over the values. Both travel together in
//! a [`LayoutContext`] that every later step receives by reference.

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

use crate::data::BarDatum;
use crate::error::{ChartError, ChartResult};
use crate::scale::{ScaleBand, ScaleLinear, zero_based_domain};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Space reserved around the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Space above the plot.
    pub top: f64,
    /// Space right of the plot.
    pub right: f64,
    /// Space below the plot (value axis labels for vertical charts).
    pub bottom: f64,
    /// Space left of the plot (category labels for horizontal charts).
    pub left: f64,
}

impl Margin {
    /// Creates margins in CSS order.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Default margins for horizontal charts: a wide left gutter for labels.
    pub const HORIZONTAL: Self = Self::new(20.0, 0.0, 30.0, 150.0);
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(20.0, 30.0, 30.0, 60.0)
    }
}

/// Outer and inner chart dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Measured container width; also the SVG width.
    pub container_width: f64,
    /// Margins around the plot.
    pub margin: Margin,
    /// Plot width.
    pub inner_width: f64,
    /// Plot height.
    pub inner_height: f64,
}

impl Geometry {
    /// Derives the plot size from a container width and an aspect ratio.
    ///
    /// `inner_width = W - left - right` and
    /// `inner_height = ceil(inner_width / aspect_ratio) - top - bottom`.
    pub fn resolve(container_width: f64, margin: Margin, aspect_ratio: f64) -> ChartResult<Self> {
        if !container_width.is_finite() || container_width <= 0.0 {
            return Err(ChartError::InvalidContainerWidth {
                width: container_width,
            });
        }
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(ChartError::InvalidAspectRatio {
                ratio: aspect_ratio,
            });
        }
        let inner_width = container_width - margin.left - margin.right;
        let inner_height = (inner_width / aspect_ratio).ceil() - margin.top - margin.bottom;
        if !(inner_width > 0.0 && inner_height > 0.0) {
            return Err(ChartError::DegenerateGeometry {
                inner_width,
                inner_height,
            });
        }
        Ok(Self {
            container_width,
            margin,
            inner_width,
            inner_height,
        })
    }

    /// Returns the SVG height: the plot height plus vertical margins.
    pub fn outer_height(&self) -> f64 {
        self.inner_height + self.margin.top + self.margin.bottom
    }

    /// Returns the plot size.
    pub fn inner_size(&self) -> Size {
        Size::new(self.inner_width, self.inner_height)
    }

    /// Returns the plot rectangle in plot coordinates.
    pub fn plot_rect(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.inner_size())
    }
}

/// Which way bars grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Labels along x, bars grow up.
    Vertical,
    /// Labels along y, bars grow right.
    Horizontal,
}

/// Everything a render pass knows about placement.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutContext {
    /// Chart dimensions.
    pub geometry: Geometry,
    /// Bar direction.
    pub orientation: Orientation,
    /// Band scale over labels, in data order.
    pub label_scale: ScaleBand,
    /// Linear scale over values, starting at zero.
    pub value_scale: ScaleLinear,
    /// Axis label font size in pixels.
    pub font_size: f64,
}

impl LayoutContext {
    /// Returns the plot width.
    pub fn inner_width(&self) -> f64 {
        self.geometry.inner_width
    }

    /// Returns the plot height.
    pub fn inner_height(&self) -> f64 {
        self.geometry.inner_height
    }

    /// Returns the band width of the label scale.
    pub fn band_width(&self) -> f64 {
        self.label_scale.band_width()
    }
}

/// Builds a chart's scales from its data.
pub trait ScaleStrategy<D> {
    /// Bar direction for charts using this strategy.
    fn orientation(&self) -> Orientation;

    /// Band scale over the data's labels.
    fn label_scale(&self, data: &[D], geometry: &Geometry) -> ScaleBand;

    /// Linear scale over the data's values.
    fn value_scale(&self, data: &[D], geometry: &Geometry) -> ScaleLinear;

    /// Assembles the layout context for one render pass.
    fn resolve(&self, data: &[D], geometry: Geometry, font_size: f64) -> LayoutContext {
        LayoutContext {
            orientation: self.orientation(),
            label_scale: self.label_scale(data, &geometry),
            value_scale: self.value_scale(data, &geometry),
            geometry,
            font_size,
        }
    }
}

/// Scales for vertical bars: labels across, values up.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerticalScales;

impl<D: BarDatum> ScaleStrategy<D> for VerticalScales {
    fn orientation(&self) -> Orientation {
        Orientation::Vertical
    }

    fn label_scale(&self, data: &[D], geometry: &Geometry) -> ScaleBand {
        ScaleBand::new(data.iter().map(BarDatum::label), (0.0, geometry.inner_width))
    }

    fn value_scale(&self, data: &[D], geometry: &Geometry) -> ScaleLinear {
        ScaleLinear::new(
            zero_based_domain(data.iter().map(BarDatum::value)),
            (geometry.inner_height, 0.0),
        )
    }
}

/// Scales for horizontal bars: labels top to bottom, values rightwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct HorizontalScales;

impl<D: BarDatum> ScaleStrategy<D> for HorizontalScales {
    fn orientation(&self) -> Orientation {
        Orientation::Horizontal
    }

    fn label_scale(&self, data: &[D], geometry: &Geometry) -> ScaleBand {
        ScaleBand::new(data.iter().map(BarDatum::label), (geometry.inner_height, 0.0))
    }

    fn value_scale(&self, data: &[D], geometry: &Geometry) -> ScaleLinear {
        ScaleLinear::new(
            zero_based_domain(data.iter().map(BarDatum::value)),
            (0.0, geometry.inner_width),
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::data::DataPoint;

    #[test]
    fn geometry_follows_aspect_ratio() {
        let g = Geometry::resolve(960.0, Margin::default(), 16.0 / 9.0).expect("valid");
        assert_abs_diff_eq!(g.inner_width, 870.0);
        // ceil(870 / (16/9)) = ceil(489.375) = 490.
        assert_abs_diff_eq!(g.inner_height, 440.0);
        assert_abs_diff_eq!(g.outer_height(), 490.0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(
            Geometry::resolve(0.0, Margin::default(), 1.0),
            Err(ChartError::InvalidContainerWidth { width: 0.0 })
        );
        assert!(
            matches!(
                Geometry::resolve(400.0, Margin::default(), f64::NAN),
                Err(ChartError::InvalidAspectRatio { .. })
            ),
            "NaN ratio"
        );
        assert!(
            matches!(
                Geometry::resolve(80.0, Margin::default(), 1.0),
                Err(ChartError::DegenerateGeometry { .. })
            ),
            "margins wider than the container"
        );
    }

    #[test]
    fn margins_load_from_json() {
        let m: Margin =
            serde_json::from_str(r#"{"top": 20, "right": 0, "bottom": 30, "left": 150}"#)
                .expect("valid margin");
        assert_eq!(m, Margin::HORIZONTAL);
    }

    #[test]
    fn vertical_scales_use_data_order_and_max() {
        let data: Vec<DataPoint> = [("B", 30.0), ("A", 10.0)]
            .into_iter()
            .map(|(l, v)| DataPoint::new(l, v))
            .collect();
        let g = Geometry::resolve(400.0, Margin::default(), 1.0).expect("valid");
        let ctx = VerticalScales.resolve(&data, g, 10.0);
        assert_eq!(ctx.label_scale.domain(), ["B", "A"]);
        assert_eq!(ctx.value_scale.domain(), (0.0, 30.0));
        assert_abs_diff_eq!(ctx.value_scale.map(30.0), 0.0);
        assert_eq!(ctx.orientation, Orientation::Vertical);
    }

    #[test]
    fn horizontal_scales_run_labels_down_the_plot() {
        let data = [DataPoint::new("first", 1.0), DataPoint::new("second", 2.0)];
        let g = Geometry::resolve(400.0, Margin::HORIZONTAL, 1.0).expect("valid");
        let ctx = HorizontalScales.resolve(&data, g, 10.0);
        let first = ctx.label_scale.map("first").expect("known");
        let second = ctx.label_scale.map("second").expect("known");
        assert!(first > second, "first label sits lower: {first} vs {second}");
        assert_eq!(ctx.value_scale.range(), (0.0, 250.0));
    }
}

// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable bar charts on top of `barviz_core`.
//!
//! This crate draws three kinds of bar chart into a retained SVG scene:
//! - **vertical** bars over labelled values ([`BarChart::vertical`]),
//! - **horizontal** bars with long labels wrapped into the left margin
//!   ([`BarChart::horizontal`]),
//! - **stacked horizontal** bars whose segments are colored per key
//!   ([`BarChart::stacked_horizontal`]).
//!
//! A chart is a configuration value built with `with_*` setters. Rendering it
//! into a [`Container`] mounts a [`ChartView`], which owns the scene and a
//! small tooltip state machine driven by [`ChartView::dispatch`] or
//! [`ChartView::hover_at`].
//!
//! ```
//! use barviz_charts::{BarChart, Container, DataPoint};
//!
//! let mut container = Container::new(640.0);
//! let data = [DataPoint::new("Theft", 10.0), DataPoint::new("Fraud", 30.0)];
//! BarChart::vertical().render(&mut container, &data).unwrap();
//! assert!(container.to_svg_string().contains(r#"class="bar theft""#));
//! ```
//!
//! Styling beyond geometry is left to a stylesheet: bars carry
//! `bar <slug>` classes and segments `segment <key> <label>` classes.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod axis;
mod bars;
mod chart;
#[cfg(test)]
mod chart_tests;
mod data;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod layout;
mod presets;
mod scale;
mod slug;
mod stacked;
mod tooltip;
mod wrap;

pub use axis::{AxisNodes, AxisOrient, AxisScale, AxisSpec, AxisStyle, draw_axes, label_axis_class};
pub use bars::{BarElement, BarRenderer, HorizontalBars, Hotspot, HoverDatum, VerticalBars, bar_class};
pub use chart::{
    BarChart, ChartView, Container, DEFAULT_ASPECT_RATIO, NoPostRender, PostRender, SVG_CLASS,
    validate_data,
};
pub use data::{BarDatum, DataPoint, Segment, StackedRow, TOTAL_LABEL};
pub use error::{ChartError, ChartResult};
pub use format::{format_tick_with_step, format_value};
pub use layout::{
    Geometry, HorizontalScales, LayoutContext, Margin, Orientation, ScaleStrategy, VerticalScales,
};
pub use presets::{
    AgeRow, UNKNOWN_AGE, age_points, create_age_chart, create_category_chart,
    create_drug_charge_class_chart, create_drug_chart, percent_of,
};
pub use scale::{ScaleBand, ScaleLinear, zero_based_domain};
pub use slug::slug;
pub use stacked::{OrdinalColors, StackedBars, StackedScales, segment_class};
pub use tooltip::{
    DefaultTooltip, PointerEvent, PointerEventKind, TOOLTIP_CLASS, TOOLTIP_MARGIN, TOOLTIP_OFFSET,
    TooltipAccessor, TooltipController, TooltipRenderer, TooltipState, TooltipText, place_tooltip,
};
pub use wrap::WrapTickLabels;

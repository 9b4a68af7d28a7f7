// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis drawing.
//!
//! An axis is a `g.<x|y>.axis` group holding one `g.tick` per tick (a short
//! rule plus a label) followed by a `path.domain` spanning the scale's range.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use barviz_core::{LineNode, NodeId, NodeKind, PathNode, Scene, Stroke, TextAnchor, TextNode};
use kurbo::{BezPath, Line};
use peniko::Brush;
use peniko::color::palette::css;

use crate::format::format_tick_with_step;
use crate::layout::{LayoutContext, Orientation};
use crate::scale::{ScaleBand, ScaleLinear};

/// Axis placement relative to the plot area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// Along the bottom edge, labels below the ticks.
    Bottom,
    /// Along the left edge, labels left of the ticks.
    Left,
}

/// The scale an axis annotates.
#[derive(Clone, Copy, Debug)]
pub enum AxisScale<'a> {
    /// Categorical: one tick per label at the band center.
    Band(&'a ScaleBand),
    /// Continuous: ticks at round values inside the domain.
    Linear(&'a ScaleLinear),
}

impl AxisScale<'_> {
    /// Returns `(position, label)` pairs for each tick.
    pub fn ticks(&self, count: usize) -> Vec<(f64, String)> {
        match self {
            Self::Band(s) => s
                .domain()
                .iter()
                .enumerate()
                .map(|(i, label)| (s.center(i), label.clone()))
                .collect(),
            Self::Linear(s) => {
                let step = s.tick_step(count);
                s.ticks(count)
                    .into_iter()
                    .map(|v| (s.map(v), format_tick_with_step(v, step)))
                    .collect()
            }
        }
    }

    /// Returns the covered range, low to high.
    pub fn extent(&self) -> (f64, f64) {
        let (a, b) = match self {
            Self::Band(s) => s.range(),
            Self::Linear(s) => s.range(),
        };
        if a <= b { (a, b) } else { (b, a) }
    }
}

/// Axis styling.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Stroke for the domain line and tick rules; left to the stylesheet when `None`.
    pub rule: Option<Stroke>,
    /// Fill for tick labels; left to the stylesheet when `None`.
    pub label_fill: Option<Brush>,
    /// Font size for tick labels.
    pub label_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            rule: Some(Stroke::solid(css::BLACK, 1.0)),
            label_fill: None,
            label_font_size: 10.0,
        }
    }
}

/// One axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    /// Placement.
    pub orient: AxisOrient,
    /// Approximate number of ticks for continuous scales.
    pub tick_count: usize,
    /// Tick rule length.
    pub tick_size: f64,
    /// Gap between the tick rule and its label.
    pub tick_padding: f64,
    /// Styling.
    pub style: AxisStyle,
}

impl AxisSpec {
    /// Creates an axis with 10 ticks, 6px rules, and 3px label padding.
    pub fn new(orient: AxisOrient) -> Self {
        Self {
            orient,
            tick_count: 10,
            tick_size: 6.0,
            tick_padding: 3.0,
            style: AxisStyle::default(),
        }
    }

    /// Sets the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Sets the style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Appends the axis group under `parent` and returns it.
    pub fn draw(&self, scene: &mut Scene, parent: NodeId, scale: AxisScale<'_>) -> Option<NodeId> {
        let axis = scene.append(parent, NodeKind::Group)?;
        scene.set_class(
            axis,
            match self.orient {
                AxisOrient::Bottom => "x axis",
                AxisOrient::Left => "y axis",
            },
        );

        let label_offset = self.tick_size + self.tick_padding;
        for (pos, label) in scale.ticks(self.tick_count) {
            let tick = scene.append(axis, NodeKind::Group)?;
            scene.set_class(tick, "tick");
            let (translate, rule_end, text) = match self.orient {
                AxisOrient::Bottom => (
                    (pos, 0.0),
                    (0.0, self.tick_size),
                    TextNode::new(label, self.style.label_font_size)
                        .with_pos(0.0, label_offset)
                        .with_dy_em(0.71)
                        .with_anchor(TextAnchor::Middle),
                ),
                AxisOrient::Left => (
                    (0.0, pos),
                    (-self.tick_size, 0.0),
                    TextNode::new(label, self.style.label_font_size)
                        .with_pos(-label_offset, 0.0)
                        .with_dy_em(0.32)
                        .with_anchor(TextAnchor::End),
                ),
            };
            scene.set_translate(tick, translate);
            scene.append(
                tick,
                NodeKind::Line(LineNode {
                    line: Line::new((0.0, 0.0), rule_end),
                    stroke: self.style.rule.clone(),
                }),
            );
            let mut text = text;
            text.fill = self.style.label_fill.clone();
            scene.append(tick, NodeKind::Text(text));
        }

        let (r0, r1) = scale.extent();
        let t = self.tick_size;
        let mut path = BezPath::new();
        match self.orient {
            AxisOrient::Bottom => {
                path.move_to((r0, t));
                path.line_to((r0, 0.0));
                path.line_to((r1, 0.0));
                path.line_to((r1, t));
            }
            AxisOrient::Left => {
                path.move_to((-t, r0));
                path.line_to((0.0, r0));
                path.line_to((0.0, r1));
                path.line_to((-t, r1));
            }
        }
        let domain = scene.append(
            axis,
            NodeKind::Path(PathNode {
                path,
                stroke: self.style.rule.clone(),
            }),
        )?;
        scene.set_class(domain, "domain");
        Some(axis)
    }
}

/// The two axis groups of a chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisNodes {
    /// The bottom axis.
    pub x: NodeId,
    /// The left axis.
    pub y: NodeId,
}

/// Returns the axis class (`"x"` or `"y"`) carrying category labels.
pub fn label_axis_class(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Vertical => "x",
        Orientation::Horizontal => "y",
    }
}

/// Draws the bottom and left axes for a render pass.
///
/// The bottom axis sits at `(0, inner_height)`. Vertical charts put labels on
/// the bottom axis and values on the left; horizontal charts swap them.
pub fn draw_axes(
    scene: &mut Scene,
    plot: NodeId,
    layout: &LayoutContext,
    tick_count: usize,
) -> Option<AxisNodes> {
    let style = AxisStyle {
        label_font_size: layout.font_size,
        ..AxisStyle::default()
    };
    let band = AxisScale::Band(&layout.label_scale);
    let linear = AxisScale::Linear(&layout.value_scale);
    let (bottom, left) = match layout.orientation {
        Orientation::Vertical => (band, linear),
        Orientation::Horizontal => (linear, band),
    };

    let x = AxisSpec::new(AxisOrient::Bottom)
        .with_tick_count(tick_count)
        .with_style(style.clone())
        .draw(scene, plot, bottom)?;
    scene.set_translate(x, (0.0, layout.inner_height()));
    let y = AxisSpec::new(AxisOrient::Left)
        .with_tick_count(tick_count)
        .with_style(style)
        .draw(scene, plot, left)?;
    Some(AxisNodes { x, y })
}

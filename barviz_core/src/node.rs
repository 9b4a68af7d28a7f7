// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene node payloads.

extern crate alloc;

use alloc::string::String;

use barviz_text::{TextMeasurer, TextStyle};
use kurbo::{BezPath, Line, Point, Rect, Shape, Vec2};
use peniko::Brush;
use smallvec::SmallVec;

use crate::NodeId;

/// A paint + width pair for stroked geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub width: f64,
}

impl Stroke {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, width: f64) -> Self {
        Self {
            brush: brush.into(),
            width,
        }
    }
}

/// Horizontal text anchoring, matching SVG `text-anchor`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the anchor position.
    #[default]
    Start,
    /// Text is centered on the anchor position.
    Middle,
    /// Text ends at the anchor position.
    End,
}

impl TextAnchor {
    /// Returns the SVG attribute value.
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }

    fn span(self, x: f64, width: f64) -> (f64, f64) {
        match self {
            Self::Start => (x, x + width),
            Self::Middle => (x - 0.5 * width, x + 0.5 * width),
            Self::End => (x - width, x),
        }
    }
}

/// The outermost `<svg>` element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgRoot {
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
}

/// An axis-aligned `<rect>`.
#[derive(Clone, Debug, PartialEq)]
pub struct RectNode {
    /// Geometry in the parent's coordinate system.
    pub rect: Rect,
    /// Optional fill; left to the stylesheet when `None`.
    pub fill: Option<Brush>,
    /// Optional stroke.
    pub stroke: Option<Stroke>,
}

impl RectNode {
    /// Creates an unpainted rectangle.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            fill: None,
            stroke: None,
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Sets the stroke.
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// A `<line>` segment (axis ticks).
#[derive(Clone, Debug, PartialEq)]
pub struct LineNode {
    /// Endpoints in the parent's coordinate system.
    pub line: Line,
    /// Optional stroke.
    pub stroke: Option<Stroke>,
}

/// An outlined `<path>` (axis domains).
///
/// Paths are never filled; they serialize with `fill="none"`.
#[derive(Clone, Debug, PartialEq)]
pub struct PathNode {
    /// Path geometry.
    pub path: BezPath,
    /// Optional stroke.
    pub stroke: Option<Stroke>,
}

/// One `<tspan>` run inside a [`TextNode`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tspan {
    /// Run content.
    pub text: String,
    /// Optional class attribute.
    pub class: Option<String>,
    /// Absolute x; starts a new text chunk when set.
    pub x: Option<f64>,
    /// Absolute y.
    pub y: Option<f64>,
    /// Relative x shift in `em`.
    pub dx_em: f64,
    /// Relative y shift in `em`.
    pub dy_em: f64,
}

impl Tspan {
    /// Creates a run with no positioning attributes.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the class attribute.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the absolute x position.
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Sets the absolute y position.
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Sets the relative x shift in `em`.
    pub fn with_dx_em(mut self, dx_em: f64) -> Self {
        self.dx_em = dx_em;
        self
    }

    /// Sets the relative y shift in `em`.
    pub fn with_dy_em(mut self, dy_em: f64) -> Self {
        self.dy_em = dy_em;
        self
    }
}

/// A `<text>` element, either plain or made of [`Tspan`] runs.
///
/// When `spans` is non-empty it replaces `text`, like clearing a text node and
/// appending tspans in the DOM.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Relative x shift in `em`.
    pub dx_em: f64,
    /// Relative y shift in `em`.
    pub dy_em: f64,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
    /// Font size in pixels; one `em`.
    pub font_size: f64,
    /// Optional fill.
    pub fill: Option<Brush>,
    /// Plain content (ignored when `spans` is non-empty).
    pub text: String,
    /// Tspan runs.
    pub spans: SmallVec<[Tspan; 2]>,
}

impl TextNode {
    /// Creates plain text at the origin.
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            dx_em: 0.0,
            dy_em: 0.0,
            anchor: TextAnchor::Start,
            font_size,
            fill: None,
            text: text.into(),
            spans: SmallVec::new(),
        }
    }

    /// Sets the anchor position.
    pub fn with_pos(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the relative y shift in `em`.
    pub fn with_dy_em(mut self, dy_em: f64) -> Self {
        self.dy_em = dy_em;
        self
    }

    /// Sets the horizontal anchoring.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Appends a tspan run.
    pub fn with_span(mut self, span: Tspan) -> Self {
        self.spans.push(span);
        self
    }

    /// Returns the concatenated text content, like DOM `textContent`.
    pub fn content(&self) -> String {
        if self.spans.is_empty() {
            return self.text.clone();
        }
        let mut out = String::new();
        for span in &self.spans {
            out.push_str(&span.text);
        }
        out
    }

    /// Estimates the bounding box of the rendered glyphs.
    ///
    /// Runs are laid out following SVG positioning rules: an absolute `x`/`y`
    /// resets the pen, `dx`/`dy` shift it, and a run without absolute `x`
    /// continues after the previous run. Each run spans `ascent` above and
    /// `descent` below its baseline.
    pub fn bounds(&self, measurer: &dyn TextMeasurer) -> Option<Rect> {
        let style = TextStyle::new(self.font_size);
        let mut pen = Point::new(
            self.x + style.em(self.dx_em),
            self.y + style.em(self.dy_em),
        );

        if self.spans.is_empty() {
            if self.text.is_empty() {
                return None;
            }
            return Some(self.run_bounds(&self.text, pen, &style, measurer));
        }

        let mut out: Option<Rect> = None;
        for span in &self.spans {
            if let Some(x) = span.x {
                pen.x = x;
            }
            if let Some(y) = span.y {
                pen.y = y;
            }
            pen += Vec2::new(style.em(span.dx_em), style.em(span.dy_em));
            if span.text.is_empty() {
                continue;
            }
            let b = self.run_bounds(&span.text, pen, &style, measurer);
            pen.x += b.width();
            out = Some(out.map_or(b, |r| r.union(b)));
        }
        out
    }

    fn run_bounds(
        &self,
        text: &str,
        pen: Point,
        style: &TextStyle,
        measurer: &dyn TextMeasurer,
    ) -> Rect {
        let metrics = measurer.measure(text, style);
        let (x0, x1) = self.anchor.span(pen.x, metrics.advance_width);
        Rect::new(x0, pen.y - metrics.ascent, x1, pen.y + metrics.descent)
    }
}

/// The element type and payload of a [`Node`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// The outermost `<svg>` element.
    Svg(SvgRoot),
    /// A `<g>` grouping element.
    Group,
    /// A `<rect>`.
    Rect(RectNode),
    /// A `<line>`.
    Line(LineNode),
    /// A `<path>`.
    Path(PathNode),
    /// A `<text>`.
    Text(TextNode),
}

impl NodeKind {
    /// Returns the SVG tag name.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Svg(_) => "svg",
            Self::Group => "g",
            Self::Rect(_) => "rect",
            Self::Line(_) => "line",
            Self::Path(_) => "path",
            Self::Text(_) => "text",
        }
    }

    /// Returns the text payload, if this is a text node.
    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the mutable text payload, if this is a text node.
    pub fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the rect payload, if this is a rect node.
    pub fn as_rect(&self) -> Option<&RectNode> {
        match self {
            Self::Rect(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the mutable rect payload, if this is a rect node.
    pub fn as_rect_mut(&mut self) -> Option<&mut RectNode> {
        match self {
            Self::Rect(r) => Some(r),
            _ => None,
        }
    }

    /// Bounds of this node's own geometry, excluding children.
    pub(crate) fn own_bounds(&self, measurer: &dyn TextMeasurer) -> Option<Rect> {
        match self {
            Self::Svg(_) | Self::Group => None,
            Self::Rect(r) => Some(r.rect),
            Self::Line(l) => Some(l.line.bounding_box()),
            Self::Path(p) => {
                if p.path.elements().is_empty() {
                    None
                } else {
                    Some(p.path.bounding_box())
                }
            }
            Self::Text(t) => t.bounds(measurer),
        }
    }
}

/// A node in a [`crate::Scene`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// This node's id.
    pub id: NodeId,
    /// Element type and payload.
    pub kind: NodeKind,
    /// Class list, in attribute order.
    pub classes: SmallVec<[String; 2]>,
    /// Translation applied to this node and its subtree.
    pub translate: Vec2,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in paint order.
    pub children: SmallVec<[NodeId; 4]>,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            id,
            kind,
            classes: SmallVec::new(),
            translate: Vec2::ZERO,
            parent,
            children: SmallVec::new(),
        }
    }

    /// Returns `true` if `class` is in this node's class list.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Returns the class list joined with spaces, like the `class` attribute.
    pub fn class_attr(&self) -> String {
        let mut out = String::new();
        for (i, c) in self.classes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(c);
        }
        out
    }
}

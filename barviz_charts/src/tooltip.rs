// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltips.
//!
//! A chart view owns one [`TooltipController`]. Pointer events name a bound
//! node (a [`Hotspot`]); entering mounts a `g.tooltip-chart` group in the plot,
//! moving repositions it next to the pointer, and leaving removes it. At most
//! one tooltip exists at a time.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;

use barviz_core::{NodeId, NodeKind, RectNode, Scene, Stroke, TextNode, Tspan};
use barviz_text::TextMeasurer;
use kurbo::{Point, Rect, Size};
use peniko::Brush;
use tracing::trace;

use crate::bars::{Hotspot, HoverDatum};

/// Class of the mounted tooltip group.
pub const TOOLTIP_CLASS: &str = "tooltip-chart";

/// Gap between the pointer and the tooltip box.
pub const TOOLTIP_OFFSET: f64 = 4.0;

/// Padding between the tooltip border and its text.
pub const TOOLTIP_MARGIN: f64 = 4.0;

/// Formats one tooltip line from the hovered datum.
pub type TooltipAccessor = Arc<dyn Fn(&HoverDatum) -> String>;

/// The two formatted lines of a tooltip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipText {
    /// First line.
    pub label: String,
    /// Second line.
    pub value: String,
}

/// Populates a freshly mounted tooltip group.
pub trait TooltipRenderer {
    /// Appends the tooltip's content under `tooltip`.
    fn render(
        &self,
        scene: &mut Scene,
        tooltip: NodeId,
        text: &TooltipText,
        measurer: &dyn TextMeasurer,
    );
}

/// A bordered box with the label above the value.
#[derive(Clone, Debug, PartialEq)]
pub struct DefaultTooltip {
    /// Font size of both lines.
    pub font_size: f64,
    /// Box fill; left to the stylesheet when `None`.
    pub background: Option<Brush>,
    /// Box border; left to the stylesheet when `None`.
    pub border: Option<Stroke>,
}

impl Default for DefaultTooltip {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            background: None,
            border: None,
        }
    }
}

impl TooltipRenderer for DefaultTooltip {
    fn render(
        &self,
        scene: &mut Scene,
        tooltip: NodeId,
        text: &TooltipText,
        measurer: &dyn TextMeasurer,
    ) {
        let mut border = RectNode::new(Rect::ZERO);
        if let Some(fill) = &self.background {
            border = border.with_fill(fill.clone());
        }
        if let Some(stroke) = &self.border {
            border = border.with_stroke(stroke.clone());
        }
        let Some(border) = scene.append(tooltip, NodeKind::Rect(border)) else {
            return;
        };

        let lines = TextNode::new("", self.font_size)
            .with_pos(TOOLTIP_MARGIN, TOOLTIP_MARGIN)
            .with_dy_em(0.75)
            .with_span(
                Tspan::new(text.label.as_str())
                    .with_class("label")
                    .with_x(TOOLTIP_MARGIN),
            )
            .with_span(
                Tspan::new(text.value.as_str())
                    .with_class("value")
                    .with_x(TOOLTIP_MARGIN)
                    .with_dy_em(1.5),
            );
        let Some(lines) = scene.append(tooltip, NodeKind::Text(lines)) else {
            return;
        };

        let Some(text_box) = scene.bbox(lines, measurer) else {
            return;
        };
        if let Some(rect) = scene
            .node_mut(border)
            .and_then(|n| n.kind.as_rect_mut())
        {
            rect.rect = Rect::new(
                0.0,
                0.0,
                text_box.width() + 2.0 * TOOLTIP_MARGIN,
                text_box.height() + 2.0 * TOOLTIP_MARGIN,
            );
        }
    }
}

/// Returns the tooltip origin for a pointer position.
///
/// The box goes below and right of the pointer, flipping to the other side on
/// an axis where it would overflow `container`.
pub fn place_tooltip(pointer: Point, size: Size, container: Size) -> Point {
    let x = if pointer.x + size.width > container.width {
        pointer.x - TOOLTIP_OFFSET - size.width
    } else {
        pointer.x + TOOLTIP_OFFSET
    };
    let y = if pointer.y + size.height > container.height {
        pointer.y - TOOLTIP_OFFSET - size.height
    } else {
        pointer.y + TOOLTIP_OFFSET
    };
    Point::new(x, y)
}

/// Pointer event kinds a bound node receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// The pointer entered the node.
    Enter,
    /// The pointer moved within the node.
    Move,
    /// The pointer left the node.
    Leave,
}

/// A pointer event targeting a bound node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// The bound node the event is for.
    pub target: NodeId,
    /// Pointer position in plot coordinates.
    pub position: Point,
}

impl PointerEvent {
    /// The pointer entered `target` at `position`.
    pub fn enter(target: NodeId, position: impl Into<Point>) -> Self {
        Self {
            kind: PointerEventKind::Enter,
            target,
            position: position.into(),
        }
    }

    /// The pointer moved to `position` within `target`.
    pub fn moved(target: NodeId, position: impl Into<Point>) -> Self {
        Self {
            kind: PointerEventKind::Move,
            target,
            position: position.into(),
        }
    }

    /// The pointer left `target` at `position`.
    pub fn leave(target: NodeId, position: impl Into<Point>) -> Self {
        Self {
            kind: PointerEventKind::Leave,
            target,
            position: position.into(),
        }
    }
}

/// Whether a tooltip is mounted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TooltipState {
    /// No tooltip.
    #[default]
    Idle,
    /// A tooltip for `target` is mounted at node `tooltip`.
    Shown {
        /// The hovered node.
        target: NodeId,
        /// The mounted tooltip group.
        tooltip: NodeId,
    },
}

/// The per-view tooltip state machine.
#[derive(Clone)]
pub struct TooltipController {
    renderer: Arc<dyn TooltipRenderer>,
    label: TooltipAccessor,
    value: TooltipAccessor,
    measurer: Arc<dyn TextMeasurer>,
    state: TooltipState,
}

impl core::fmt::Debug for TooltipController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TooltipController")
            .field("renderer", &"<renderer>")
            .field("label", &"<fn>")
            .field("value", &"<fn>")
            .field("measurer", &"<measurer>")
            .field("state", &self.state)
            .finish()
    }
}

impl TooltipController {
    /// Creates an idle controller.
    pub fn new(
        renderer: Arc<dyn TooltipRenderer>,
        label: TooltipAccessor,
        value: TooltipAccessor,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Self {
        Self {
            renderer,
            label,
            value,
            measurer,
            state: TooltipState::Idle,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> TooltipState {
        self.state
    }

    /// Formats the tooltip lines for `datum`.
    pub fn text_for(&self, datum: &HoverDatum) -> TooltipText {
        TooltipText {
            label: (self.label)(datum),
            value: (self.value)(datum),
        }
    }

    /// Applies one pointer event.
    ///
    /// `container` is the plot size used for overflow flipping. Events for
    /// nodes that are not in `hotspots`, and moves or leaves for a node that
    /// is not the shown one, are ignored.
    pub fn handle(
        &mut self,
        scene: &mut Scene,
        plot: NodeId,
        container: Size,
        hotspots: &[Hotspot],
        event: &PointerEvent,
    ) {
        let Some(hotspot) = hotspots.iter().find(|h| h.node == event.target) else {
            trace!(target_node = event.target.0, "pointer event for unbound node ignored");
            return;
        };

        match (event.kind, self.state) {
            (PointerEventKind::Enter, _) => {
                self.hide(scene);
                self.show(scene, plot, container, hotspot, event.position);
            }
            (PointerEventKind::Move, TooltipState::Shown { target, tooltip })
                if target == event.target =>
            {
                self.position(scene, tooltip, container, event.position);
            }
            (PointerEventKind::Leave, TooltipState::Shown { target, .. })
                if target == event.target =>
            {
                self.hide(scene);
            }
            (kind, state) => {
                trace!(?kind, ?state, target_node = event.target.0, "pointer event ignored");
            }
        }
    }

    /// Removes any mounted tooltip and returns to idle.
    pub fn hide(&mut self, scene: &mut Scene) {
        if let TooltipState::Shown { tooltip, target } = self.state {
            scene.remove(tooltip);
            trace!(target_node = target.0, "tooltip hidden");
        }
        self.state = TooltipState::Idle;
    }

    fn show(
        &mut self,
        scene: &mut Scene,
        plot: NodeId,
        container: Size,
        hotspot: &Hotspot,
        pointer: Point,
    ) {
        let Some(tooltip) = scene.append(plot, NodeKind::Group) else {
            return;
        };
        scene.set_class(tooltip, TOOLTIP_CLASS);
        let text = self.text_for(&hotspot.datum);
        self.renderer
            .render(scene, tooltip, &text, self.measurer.as_ref());
        self.position(scene, tooltip, container, pointer);
        self.state = TooltipState::Shown {
            target: hotspot.node,
            tooltip,
        };
        trace!(target_node = hotspot.node.0, label = %text.label, "tooltip shown");
    }

    fn position(&self, scene: &mut Scene, tooltip: NodeId, container: Size, pointer: Point) {
        let size = scene
            .bbox(tooltip, self.measurer.as_ref())
            .map_or(Size::ZERO, |b| b.size());
        let origin = place_tooltip(pointer, size, container);
        scene.set_translate(tooltip, origin.to_vec2());
    }
}

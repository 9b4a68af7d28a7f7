// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapping long category labels into the left margin.

use barviz_core::{NodeId, Scene, Tspan};
use barviz_text::{TextMeasurer, TextStyle, wrap_words};
use tracing::trace;

use crate::axis::label_axis_class;
use crate::chart::PostRender;
use crate::layout::LayoutContext;

/// Post-render hook that wraps the label axis' tick text.
///
/// Each label is split into lines no wider than `margin.left - inset`; lines
/// stack `line_height_em` apart, the block is centered on the tick, and every
/// line is shifted left by `indent_em`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapTickLabels {
    /// Space kept free between the wrapped text and the left edge.
    pub inset: f64,
    /// Line spacing in `em`.
    pub line_height_em: f64,
    /// Leftward nudge of each line in `em`.
    pub indent_em: f64,
}

impl Default for WrapTickLabels {
    fn default() -> Self {
        Self {
            inset: 20.0,
            line_height_em: 1.1,
            indent_em: 1.0,
        }
    }
}

impl PostRender for WrapTickLabels {
    fn post_render(
        &self,
        scene: &mut Scene,
        root: NodeId,
        layout: &LayoutContext,
        measurer: &dyn TextMeasurer,
    ) {
        let width = layout.geometry.margin.left - self.inset;
        let axes = scene.select_all(root, label_axis_class(layout.orientation));
        for axis in axes {
            if !scene.node(axis).is_some_and(|n| n.has_class("axis")) {
                continue;
            }
            for text in scene.select_text_in(axis, "tick") {
                self.wrap_text(scene, text, width, measurer);
            }
        }
    }
}

impl WrapTickLabels {
    /// Rewrites the text node `id` as one tspan per wrapped line.
    ///
    /// Returns the number of lines, `0` if `id` is not a text node or is blank.
    pub fn wrap_text(
        &self,
        scene: &mut Scene,
        id: NodeId,
        width: f64,
        measurer: &dyn TextMeasurer,
    ) -> usize {
        let Some(text) = scene.node_mut(id).and_then(|n| n.kind.as_text_mut()) else {
            return 0;
        };
        let style = TextStyle::new(text.font_size);
        let content = text.content();
        let lines = wrap_words(&content, width, &style, measurer);
        if lines.is_empty() {
            return 0;
        }

        let count = lines.len();
        let y = text.y - style.em(self.line_height_em * (count - 1) as f64 / 2.0);
        let dy = text.dy_em;
        text.spans = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                Tspan::new(line)
                    .with_x(0.0)
                    .with_y(y)
                    .with_dx_em(-self.indent_em)
                    .with_dy_em(i as f64 * self.line_height_em + dy)
            })
            .collect();
        text.y = y;
        text.text.clear();
        trace!(label = %content, lines = count, "wrapped tick label");
        count
    }
}

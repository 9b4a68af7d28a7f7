// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar rendering for single-value charts.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use barviz_core::{NodeId, NodeKind, RectNode, Scene};
use kurbo::Rect;
use peniko::Brush;

use crate::data::BarDatum;
use crate::layout::LayoutContext;
use crate::slug::slug;

/// The element a renderer emits per datum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarElement {
    /// One `<rect>` per datum.
    Rect,
    /// One `<g>` per datum holding several segment rects.
    Group,
}

/// The label/value pair a tooltip describes.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverDatum {
    /// Label shown on the first tooltip line.
    pub label: String,
    /// Raw value, formatted by the chart's value accessor.
    pub value: f64,
}

impl HoverDatum {
    /// Creates a hover datum.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A node bound to pointer events.
#[derive(Clone, Debug, PartialEq)]
pub struct Hotspot {
    /// The bound node; pointer events name it as their target.
    pub node: NodeId,
    /// The node's area in plot coordinates, used for hit testing.
    pub bounds: Rect,
    /// What the tooltip shows while the node is hovered.
    pub datum: HoverDatum,
}

/// Draws one bar (or stacked bar) per datum into the plot group.
pub trait BarRenderer<D> {
    /// The element kind emitted per datum.
    fn element(&self) -> BarElement;

    /// Appends bars for `data` under `plot` and returns the nodes to bind for
    /// hovering, in paint order.
    fn render(
        &self,
        scene: &mut Scene,
        plot: NodeId,
        data: &[D],
        layout: &LayoutContext,
    ) -> Vec<Hotspot>;
}

/// Returns the class list for a bar: `"bar <slug>"`.
pub fn bar_class(label: &str) -> String {
    let s = slug(label);
    if s.is_empty() {
        String::from("bar")
    } else {
        format!("bar {s}")
    }
}

/// Vertical bars rising from the bottom of the plot.
#[derive(Clone, Debug, Default)]
pub struct VerticalBars {
    /// Optional fill; unset bars are left to the stylesheet.
    pub fill: Option<Brush>,
}

impl VerticalBars {
    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = Some(fill.into());
        self
    }
}

impl<D: BarDatum> BarRenderer<D> for VerticalBars {
    fn element(&self) -> BarElement {
        BarElement::Rect
    }

    fn render(
        &self,
        scene: &mut Scene,
        plot: NodeId,
        data: &[D],
        layout: &LayoutContext,
    ) -> Vec<Hotspot> {
        let bw = layout.band_width();
        let h = layout.inner_height();
        let rects = data.iter().filter_map(|d| {
            let x = layout.label_scale.map(d.label())?;
            let y = layout.value_scale.map(d.value());
            Some((d, Rect::new(x, y, x + bw, h)))
        });
        draw_rects(scene, plot, self.fill.as_ref(), rects)
    }
}

/// Horizontal bars growing from the left edge of the plot.
#[derive(Clone, Debug, Default)]
pub struct HorizontalBars {
    /// Optional fill; unset bars are left to the stylesheet.
    pub fill: Option<Brush>,
}

impl HorizontalBars {
    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = Some(fill.into());
        self
    }
}

impl<D: BarDatum> BarRenderer<D> for HorizontalBars {
    fn element(&self) -> BarElement {
        BarElement::Rect
    }

    fn render(
        &self,
        scene: &mut Scene,
        plot: NodeId,
        data: &[D],
        layout: &LayoutContext,
    ) -> Vec<Hotspot> {
        let bw = layout.band_width();
        let rects = data.iter().filter_map(|d| {
            let y = layout.label_scale.map(d.label())?;
            let w = layout.value_scale.map(d.value());
            Some((d, Rect::new(0.0, y, w, y + bw)))
        });
        draw_rects(scene, plot, self.fill.as_ref(), rects)
    }
}

fn draw_rects<'a, D: BarDatum + 'a>(
    scene: &mut Scene,
    plot: NodeId,
    fill: Option<&Brush>,
    rects: impl Iterator<Item = (&'a D, Rect)>,
) -> Vec<Hotspot> {
    let mut hotspots = Vec::new();
    for (d, rect) in rects {
        let mut node = RectNode::new(rect);
        if let Some(fill) = fill {
            node = node.with_fill(fill.clone());
        }
        let Some(id) = scene.append(plot, NodeKind::Rect(node)) else {
            break;
        };
        scene.set_class(id, &bar_class(d.label()));
        hotspots.push(Hotspot {
            node: id,
            bounds: rect,
            datum: HoverDatum::new(d.label(), d.value()),
        });
    }
    hotspots
}

#[cfg(test)]
mod tests {
    extern crate std;

    use approx::assert_abs_diff_eq;
    use barviz_core::SvgRoot;
    use peniko::color::palette::css;

    use super::*;
    use crate::data::DataPoint;
    use crate::layout::{Geometry, HorizontalScales, Margin, ScaleStrategy, VerticalScales};

    fn plot_scene() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let svg = scene.set_root(NodeKind::Svg(SvgRoot {
            width: 400.0,
            height: 400.0,
        }));
        let plot = scene.append(svg, NodeKind::Group).expect("root exists");
        (scene, plot)
    }

    fn rect_of(scene: &Scene, id: NodeId) -> Rect {
        scene
            .node(id)
            .and_then(|n| n.kind.as_rect())
            .expect("rect node")
            .rect
    }

    #[test]
    fn vertical_bars_sit_on_the_baseline() {
        let data = [DataPoint::new("A", 10.0), DataPoint::new("B", 30.0)];
        let g = Geometry::resolve(400.0, Margin::default(), 1.0).expect("valid");
        let layout = VerticalScales.resolve(&data, g, 10.0);
        let (mut scene, plot) = plot_scene();

        let hotspots = VerticalBars::default().render(&mut scene, plot, &data, &layout);
        assert_eq!(hotspots.len(), 2);
        let a = rect_of(&scene, hotspots[0].node);
        let b = rect_of(&scene, hotspots[1].node);
        assert_abs_diff_eq!(a.y1, layout.inner_height());
        assert_abs_diff_eq!(b.y0, 0.0);
        assert_abs_diff_eq!(b.height(), 3.0 * a.height(), epsilon = 1e-9);
        assert_abs_diff_eq!(a.width(), layout.band_width());
        assert!(scene.node(hotspots[0].node).expect("live").has_class("a"), "slugged label");
    }

    #[test]
    fn horizontal_bars_grow_from_the_left() {
        let data = [DataPoint::new("Drug Offense", 5.0), DataPoint::new("Theft", 0.0)];
        let g = Geometry::resolve(400.0, Margin::HORIZONTAL, 1.0).expect("valid");
        let layout = HorizontalScales.resolve(&data, g, 10.0);
        let (mut scene, plot) = plot_scene();

        let hotspots = HorizontalBars::default().render(&mut scene, plot, &data, &layout);
        let full = rect_of(&scene, hotspots[0].node);
        let empty = rect_of(&scene, hotspots[1].node);
        assert_abs_diff_eq!(full.x0, 0.0);
        assert_abs_diff_eq!(full.x1, layout.inner_width());
        assert_abs_diff_eq!(empty.width(), 0.0);
        assert_eq!(
            scene.node(hotspots[0].node).expect("live").class_attr(),
            "bar drug-offense"
        );
        assert_eq!(hotspots[1].datum, HoverDatum::new("Theft", 0.0));
    }

    #[test]
    fn all_zero_values_draw_zero_length_bars() {
        let data = [DataPoint::new("A", 0.0), DataPoint::new("B", 0.0)];
        let g = Geometry::resolve(400.0, Margin::default(), 1.0).expect("valid");
        let layout = VerticalScales.resolve(&data, g, 10.0);
        let (mut scene, plot) = plot_scene();
        for h in VerticalBars::default().render(&mut scene, plot, &data, &layout) {
            assert_abs_diff_eq!(rect_of(&scene, h.node).height(), 0.0);
        }
    }

    #[test]
    fn configured_fills_are_painted_inline() {
        let data = [DataPoint::new("A", 1.0)];
        let g = Geometry::resolve(400.0, Margin::default(), 1.0).expect("valid");
        let (mut scene, plot) = plot_scene();

        let layout = VerticalScales.resolve(&data, g, 10.0);
        let painted = VerticalBars::default().with_fill(css::STEEL_BLUE);
        let h = painted.render(&mut scene, plot, &data, &layout);
        let fill = scene.node(h[0].node).and_then(|n| n.kind.as_rect()).expect("rect");
        assert_eq!(fill.fill, Some(Brush::from(css::STEEL_BLUE)));

        let layout = HorizontalScales.resolve(&data, g, 10.0);
        let h = HorizontalBars::default().render(&mut scene, plot, &data, &layout);
        let plain = scene.node(h[0].node).and_then(|n| n.kind.as_rect()).expect("rect");
        assert_eq!(plain.fill, None);

        let h = HorizontalBars::default()
            .with_fill(css::ORANGE)
            .render(&mut scene, plot, &data, &layout);
        let painted = scene.node(h[0].node).and_then(|n| n.kind.as_rect()).expect("rect");
        assert_eq!(painted.fill, Some(Brush::from(css::ORANGE)));
    }

    #[test]
    fn blank_slugs_leave_the_bare_class() {
        assert_eq!(bar_class("???"), "bar");
        assert_eq!(bar_class("Class A"), "bar class-a");
    }
}

// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked horizontal bars: one row group per record, one rect per segment.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use barviz_core::{NodeId, NodeKind, RectNode, Scene};
use kurbo::{Rect, Vec2};
use peniko::Brush;

use crate::bars::{BarElement, BarRenderer, Hotspot, HoverDatum, bar_class};
use crate::data::{BarDatum, StackedRow};
use crate::layout::{Geometry, HorizontalScales, LayoutContext, Orientation, ScaleStrategy};
use crate::scale::{ScaleBand, ScaleLinear, zero_based_domain};
use crate::slug::slug;

/// An ordinal mapping from segment keys to fills.
///
/// Keys take colors by position; a palette shorter than the key list wraps
/// around.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrdinalColors {
    keys: Vec<String>,
    palette: Vec<Brush>,
}

impl OrdinalColors {
    /// Pairs `keys` with `palette`, in order.
    pub fn new<K, B>(
        keys: impl IntoIterator<Item = K>,
        palette: impl IntoIterator<Item = B>,
    ) -> Self
    where
        K: Into<String>,
        B: Into<Brush>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            palette: palette.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the keys in stacking order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the fill for `key`, or `None` for unknown keys or an empty palette.
    pub fn get(&self, key: &str) -> Option<&Brush> {
        if self.palette.is_empty() {
            return None;
        }
        let i = self.keys.iter().position(|k| k == key)?;
        self.palette.get(i % self.palette.len())
    }
}

/// Scales for stacked rows: horizontal bands, values up to the largest total.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackedScales;

impl ScaleStrategy<StackedRow> for StackedScales {
    fn orientation(&self) -> Orientation {
        Orientation::Horizontal
    }

    fn label_scale(&self, data: &[StackedRow], geometry: &Geometry) -> ScaleBand {
        ScaleStrategy::<StackedRow>::label_scale(&HorizontalScales, data, geometry)
    }

    fn value_scale(&self, data: &[StackedRow], geometry: &Geometry) -> ScaleLinear {
        ScaleLinear::new(
            zero_based_domain(data.iter().map(|row| row.total.value)),
            (0.0, geometry.inner_width),
        )
    }
}

/// Renders each row as a group of segment rects laid end to end.
///
/// Rows are not hover targets; each segment is, reporting its own label and
/// value.
#[derive(Clone, Debug, Default)]
pub struct StackedBars {
    /// Segment keys and their fills, in stacking order.
    pub colors: OrdinalColors,
}

impl StackedBars {
    /// Stacks segments in `keys` order, filled from `palette`.
    pub fn new<K, B>(keys: impl IntoIterator<Item = K>, palette: impl IntoIterator<Item = B>) -> Self
    where
        K: Into<String>,
        B: Into<Brush>,
    {
        Self {
            colors: OrdinalColors::new(keys, palette),
        }
    }
}

/// Returns the class list for a segment: `"segment <slug(key)> <slug(label)>"`.
pub fn segment_class(key: &str, label: &str) -> String {
    let mut out = String::from("segment");
    for part in [slug(key), slug(label)] {
        if !part.is_empty() {
            out.push(' ');
            out.push_str(&part);
        }
    }
    out
}

impl BarRenderer<StackedRow> for StackedBars {
    fn element(&self) -> BarElement {
        BarElement::Group
    }

    fn render(
        &self,
        scene: &mut Scene,
        plot: NodeId,
        data: &[StackedRow],
        layout: &LayoutContext,
    ) -> Vec<Hotspot> {
        let bw = layout.band_width();
        let x = &layout.value_scale;
        let mut hotspots = Vec::new();

        for row in data {
            let Some(y) = layout.label_scale.map(row.label()) else {
                continue;
            };
            let Some(group) = scene.append(plot, NodeKind::Group) else {
                break;
            };
            scene.set_class(group, &bar_class(row.label()));
            scene.set_translate(group, (0.0, y));

            for segment in row.segments_in(self.colors.keys()) {
                let x0 = x.map(segment.x0);
                let rect = Rect::new(x0, 0.0, x0 + x.map(segment.value), bw);
                let mut node = RectNode::new(rect);
                if let Some(fill) = self.colors.get(&segment.key) {
                    node = node.with_fill(fill.clone());
                }
                let Some(id) = scene.append(group, NodeKind::Rect(node)) else {
                    continue;
                };
                scene.set_class(id, &segment_class(&segment.key, &segment.label));
                hotspots.push(Hotspot {
                    node: id,
                    bounds: rect + Vec2::new(0.0, y),
                    datum: HoverDatum::new(segment.label, segment.value),
                });
            }
        }
        hotspots
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use approx::assert_abs_diff_eq;
    use barviz_core::SvgRoot;
    use peniko::color::palette::css;
    use proptest::prelude::*;

    use super::*;
    use crate::layout::Margin;

    #[test]
    fn colors_cycle_through_a_short_palette() {
        let colors = OrdinalColors::new(["a", "b", "c"], [css::RED, css::BLUE]);
        assert_eq!(colors.get("a"), Some(&Brush::from(css::RED)));
        assert_eq!(colors.get("c"), Some(&Brush::from(css::RED)));
        assert_eq!(colors.get("b"), Some(&Brush::from(css::BLUE)));
        assert_eq!(colors.get("z"), None);
    }

    #[test]
    fn segment_classes_slug_key_and_label() {
        assert_eq!(segment_class("Class A", "Felony A"), "segment class-a felony-a");
        assert_eq!(segment_class("!", "x"), "segment x");
    }

    #[test]
    fn segments_tile_each_row() {
        let rows = [
            StackedRow::new("Theft", [("Class A", 3.0), ("Class B", 4.0)]),
            StackedRow::new("Assault", [("Class B", 14.0)]),
        ];
        let g = Geometry::resolve(400.0, Margin::HORIZONTAL, 1.0).expect("valid");
        let layout = StackedScales.resolve(&rows, g, 10.0);
        assert_eq!(layout.value_scale.domain(), (0.0, 14.0));

        let mut scene = Scene::new();
        let svg = scene.set_root(NodeKind::Svg(SvgRoot {
            width: 400.0,
            height: 250.0,
        }));
        let plot = scene.append(svg, NodeKind::Group).expect("root exists");
        let bars = StackedBars::new(["Class A", "Class B"], [css::RED, css::BLUE]);
        let hotspots = bars.render(&mut scene, plot, &rows, &layout);

        assert_eq!(hotspots.len(), 3, "rows are not hover targets");
        let theft_y = layout.label_scale.map("Theft").expect("known");
        let a = hotspots[0].bounds;
        let b = hotspots[1].bounds;
        assert_abs_diff_eq!(a.x0, 0.0);
        assert_abs_diff_eq!(a.x1, b.x0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.x1, layout.value_scale.map(7.0), epsilon = 1e-9);
        assert_abs_diff_eq!(a.y0, theft_y);
        assert_eq!(hotspots[1].datum, HoverDatum::new("Class B", 4.0));

        let rows_g = scene.select_all(plot, "bar");
        assert_eq!(rows_g.len(), 2);
        let theft = scene.node(rows_g[0]).expect("live");
        assert_eq!(theft.translate.y, theft_y);
        assert_eq!(theft.class_attr(), "bar theft");
    }

    proptest! {
        #[test]
        fn segment_extents_sum_to_the_total(values in proptest::collection::vec(0.0_f64..1e6, 1..8)) {
            let keys: Vec<String> = (0..values.len()).map(|i| alloc::format!("k{i}")).collect();
            let row = StackedRow::new("row", keys.iter().cloned().zip(values.iter().copied()));
            let segments = row.segments_in(&keys);
            let last = segments.last().map_or(0.0, |s| s.x1);
            prop_assert!((last - row.total.value).abs() <= 1e-6 * row.total.value.max(1.0));
            prop_assert!((row.segment_sum() - row.total.value).abs() <= 1e-9 * row.total.value.max(1.0));
        }
    }
}

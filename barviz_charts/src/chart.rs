// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart configuration and the render entry point.
//!
//! A [`BarChart`] is a plain configuration value: margins, aspect ratio, and a
//! handful of strategy objects (scales, bar renderer, tooltip renderer,
//! post-render hook). [`BarChart::render`] validates the data, resolves the
//! layout for the container's width, and mounts a fresh [`ChartView`] into
//! the [`Container`], replacing whatever was there.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use barviz_core::{NodeId, NodeKind, Scene, SvgRoot};
use barviz_text::{HeuristicTextMeasurer, TextMeasurer};
use hashbrown::HashSet;
use kurbo::Point;
use tracing::{debug, trace};

use crate::axis::draw_axes;
use crate::bars::{BarElement, BarRenderer, Hotspot, HorizontalBars, HoverDatum, VerticalBars};
use crate::data::{BarDatum, StackedRow};
use crate::error::{ChartError, ChartResult};
use crate::format::format_value;
use crate::layout::{
    Geometry, HorizontalScales, LayoutContext, Margin, ScaleStrategy, VerticalScales,
};
use crate::stacked::{StackedBars, StackedScales};
use crate::tooltip::{
    DefaultTooltip, PointerEvent, TooltipAccessor, TooltipController, TooltipRenderer,
    TooltipState,
};
use crate::wrap::WrapTickLabels;

/// Class of the outer `<svg>` element.
pub const SVG_CLASS: &str = "chart-bar";

/// Default width-to-height ratio of the plot.
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// A hook run after bars and axes are drawn.
///
/// `root` is the plot group (translated by the margins).
pub trait PostRender {
    /// Adjusts the rendered scene.
    fn post_render(
        &self,
        scene: &mut Scene,
        root: NodeId,
        layout: &LayoutContext,
        measurer: &dyn TextMeasurer,
    );
}

impl<F> PostRender for F
where
    F: Fn(&mut Scene, NodeId, &LayoutContext, &dyn TextMeasurer),
{
    fn post_render(
        &self,
        scene: &mut Scene,
        root: NodeId,
        layout: &LayoutContext,
        measurer: &dyn TextMeasurer,
    ) {
        self(scene, root, layout, measurer);
    }
}

/// A post-render hook that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPostRender;

impl PostRender for NoPostRender {
    fn post_render(&self, _: &mut Scene, _: NodeId, _: &LayoutContext, _: &dyn TextMeasurer) {}
}

/// A configurable bar chart over data of type `D`.
pub struct BarChart<D> {
    /// Space around the plot.
    pub margin: Margin,
    /// Plot width divided by the outer height.
    pub aspect_ratio: f64,
    /// Builds the label and value scales.
    pub scales: Arc<dyn ScaleStrategy<D>>,
    /// Draws the bars and picks the hover targets.
    pub renderer: Arc<dyn BarRenderer<D>>,
    /// Fills a mounted tooltip.
    pub tooltip_renderer: Arc<dyn TooltipRenderer>,
    /// First tooltip line.
    pub tooltip_label: TooltipAccessor,
    /// Second tooltip line.
    pub tooltip_value: TooltipAccessor,
    /// Runs last, with the plot group.
    pub post_render: Arc<dyn PostRender>,
    /// Whether bars react to the pointer.
    pub hover: bool,
    /// Measures text for tooltips and label wrapping.
    pub measurer: Arc<dyn TextMeasurer>,
    /// Axis label font size.
    pub font_size: f64,
    /// Approximate number of value-axis ticks.
    pub tick_count: usize,
}

impl<D> Clone for BarChart<D> {
    fn clone(&self) -> Self {
        Self {
            margin: self.margin,
            aspect_ratio: self.aspect_ratio,
            scales: self.scales.clone(),
            renderer: self.renderer.clone(),
            tooltip_renderer: self.tooltip_renderer.clone(),
            tooltip_label: self.tooltip_label.clone(),
            tooltip_value: self.tooltip_value.clone(),
            post_render: self.post_render.clone(),
            hover: self.hover,
            measurer: self.measurer.clone(),
            font_size: self.font_size,
            tick_count: self.tick_count,
        }
    }
}

impl<D> core::fmt::Debug for BarChart<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BarChart")
            .field("margin", &self.margin)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("bar_element", &self.renderer.element())
            .field("hover", &self.hover)
            .field("font_size", &self.font_size)
            .field("tick_count", &self.tick_count)
            .finish_non_exhaustive()
    }
}

impl<D: BarDatum + 'static> BarChart<D> {
    /// A vertical bar chart with default margins.
    pub fn vertical() -> Self {
        Self {
            margin: Margin::default(),
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            scales: Arc::new(VerticalScales),
            renderer: Arc::new(VerticalBars::default()),
            tooltip_renderer: Arc::new(DefaultTooltip::default()),
            tooltip_label: Arc::new(|d: &HoverDatum| d.label.clone()),
            tooltip_value: Arc::new(|d: &HoverDatum| format_value(d.value)),
            post_render: Arc::new(NoPostRender),
            hover: true,
            measurer: Arc::new(HeuristicTextMeasurer),
            font_size: 10.0,
            tick_count: 10,
        }
    }

    /// A horizontal bar chart with a wide left margin and wrapped labels.
    pub fn horizontal() -> Self {
        Self::vertical()
            .with_margin(Margin::HORIZONTAL)
            .with_scales(HorizontalScales)
            .with_renderer(HorizontalBars::default())
            .with_post_render(WrapTickLabels::default())
    }
}

impl BarChart<StackedRow> {
    /// A horizontal chart stacking each row's segments in `keys` order.
    ///
    /// Segment fills come from `palette` by key position. Segments, not rows,
    /// are the hover targets.
    pub fn stacked_horizontal<K, B>(
        keys: impl IntoIterator<Item = K>,
        palette: impl IntoIterator<Item = B>,
    ) -> Self
    where
        K: Into<String>,
        B: Into<peniko::Brush>,
    {
        Self::horizontal()
            .with_scales(StackedScales)
            .with_renderer(StackedBars::new(keys, palette))
    }
}

impl<D> BarChart<D> {
    /// Returns the margins.
    pub fn margin(&self) -> Margin {
        self.margin
    }

    /// Returns the aspect ratio.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Returns the element kind the renderer emits per datum.
    pub fn bar_element(&self) -> BarElement {
        self.renderer.element()
    }

    /// Sets the margins.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Sets the scale strategy.
    pub fn with_scales(mut self, scales: impl ScaleStrategy<D> + 'static) -> Self {
        self.scales = Arc::new(scales);
        self
    }

    /// Sets the bar renderer.
    pub fn with_renderer(mut self, renderer: impl BarRenderer<D> + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Sets the tooltip renderer.
    pub fn with_tooltip_renderer(mut self, renderer: impl TooltipRenderer + 'static) -> Self {
        self.tooltip_renderer = Arc::new(renderer);
        self
    }

    /// Sets how the first tooltip line is formatted.
    pub fn with_tooltip_label(mut self, f: impl Fn(&HoverDatum) -> String + 'static) -> Self {
        self.tooltip_label = Arc::new(f);
        self
    }

    /// Sets how the second tooltip line is formatted.
    pub fn with_tooltip_value(mut self, f: impl Fn(&HoverDatum) -> String + 'static) -> Self {
        self.tooltip_value = Arc::new(f);
        self
    }

    /// Sets the post-render hook.
    pub fn with_post_render(mut self, hook: impl PostRender + 'static) -> Self {
        self.post_render = Arc::new(hook);
        self
    }

    /// Enables or disables pointer interaction.
    pub fn with_hover(mut self, hover: bool) -> Self {
        self.hover = hover;
        self
    }

    /// Sets the text measurer.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Arc::new(measurer);
        self
    }

    /// Sets the axis label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the approximate number of value-axis ticks.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }
}

impl<D: BarDatum> BarChart<D> {
    /// Renders `data` into `container`, replacing any mounted chart.
    ///
    /// On error the container is left as it was.
    pub fn render(&self, container: &mut Container, data: &[D]) -> ChartResult<()> {
        let view = self.build(container.width(), data)?;
        container.mount(view);
        Ok(())
    }

    /// Renders `data` for a container `container_width` pixels wide.
    pub fn build(&self, container_width: f64, data: &[D]) -> ChartResult<ChartView> {
        validate_data(data)?;
        let geometry = Geometry::resolve(container_width, self.margin, self.aspect_ratio)?;
        let layout = self.scales.resolve(data, geometry, self.font_size);
        debug!(
            container_width,
            inner_width = geometry.inner_width,
            inner_height = geometry.inner_height,
            records = data.len(),
            element = ?self.renderer.element(),
            "rendering bar chart"
        );

        let mut scene = Scene::new();
        let svg = scene.set_root(NodeKind::Svg(SvgRoot {
            width: container_width,
            height: geometry.outer_height(),
        }));
        scene.set_class(svg, SVG_CLASS);
        let root = scene
            .append(svg, NodeKind::Group)
            .expect("svg root was just created");
        scene.set_translate(root, (self.margin.left, self.margin.top));

        let hotspots = self.renderer.render(&mut scene, root, data, &layout);
        draw_axes(&mut scene, root, &layout, self.tick_count);
        self.post_render
            .post_render(&mut scene, root, &layout, self.measurer.as_ref());

        Ok(ChartView {
            scene,
            root,
            layout,
            hotspots: if self.hover { hotspots } else { Vec::new() },
            tooltip: TooltipController::new(
                self.tooltip_renderer.clone(),
                self.tooltip_label.clone(),
                self.tooltip_value.clone(),
                self.measurer.clone(),
            ),
        })
    }
}

/// Checks that `data` is non-empty, drawable, and uniquely labelled.
pub fn validate_data<D: BarDatum>(data: &[D]) -> ChartResult<()> {
    if data.is_empty() {
        return Err(ChartError::EmptyData);
    }
    let mut seen = HashSet::with_capacity(data.len());
    for d in data {
        d.validate()?;
        if !seen.insert(d.label()) {
            return Err(ChartError::DuplicateLabel {
                label: String::from(d.label()),
            });
        }
    }
    Ok(())
}

/// The host element a chart renders into.
#[derive(Debug)]
pub struct Container {
    width: f64,
    view: Option<ChartView>,
}

impl Container {
    /// Creates an empty container `width` pixels wide.
    pub fn new(width: f64) -> Self {
        Self { width, view: None }
    }

    /// Returns the container width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Changes the width used by the next render.
    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Returns the mounted chart.
    pub fn view(&self) -> Option<&ChartView> {
        self.view.as_ref()
    }

    /// Returns the mounted chart for event delivery.
    pub fn view_mut(&mut self) -> Option<&mut ChartView> {
        self.view.as_mut()
    }

    /// Mounts `view`, returning the chart it replaces.
    pub fn mount(&mut self, view: ChartView) -> Option<ChartView> {
        let previous = self.view.replace(view);
        if previous.is_some() {
            trace!("replaced mounted chart");
        }
        previous
    }

    /// Unmounts and returns the current chart.
    pub fn clear(&mut self) -> Option<ChartView> {
        self.view.take()
    }

    /// Serializes the mounted chart, or returns an empty string.
    pub fn to_svg_string(&self) -> String {
        self.view
            .as_ref()
            .map_or_else(String::new, ChartView::to_svg_string)
    }
}

/// A rendered chart: its scene plus hover state.
#[derive(Debug)]
pub struct ChartView {
    scene: Scene,
    root: NodeId,
    layout: LayoutContext,
    hotspots: Vec<Hotspot>,
    tooltip: TooltipController,
}

impl ChartView {
    /// Returns the scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the plot group, translated by the margins.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the layout this view was drawn with.
    pub fn layout(&self) -> &LayoutContext {
        &self.layout
    }

    /// Returns the hover targets, in paint order.
    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    /// Returns the tooltip state.
    pub fn tooltip_state(&self) -> TooltipState {
        self.tooltip.state()
    }

    /// Returns the topmost hover target under `position` (plot coordinates).
    pub fn hit_test(&self, position: Point) -> Option<&Hotspot> {
        self.hotspots
            .iter()
            .rev()
            .find(|h| h.bounds.contains(position))
    }

    /// Delivers one pointer event.
    pub fn dispatch(&mut self, event: PointerEvent) {
        self.tooltip.handle(
            &mut self.scene,
            self.root,
            self.layout.geometry.inner_size(),
            &self.hotspots,
            &event,
        );
    }

    /// Moves the pointer to `position` (plot coordinates), or off the chart
    /// for `None`, emitting the implied leave/enter/move events.
    pub fn hover_at(&mut self, position: Option<Point>) {
        let hit = position.and_then(|p| self.hit_test(p).map(|h| h.node));
        let shown = match self.tooltip.state() {
            TooltipState::Shown { target, .. } => Some(target),
            TooltipState::Idle => None,
        };
        let at = position.unwrap_or(Point::ZERO);

        if shown.is_some() && shown == hit {
            if let Some(target) = hit {
                self.dispatch(PointerEvent::moved(target, at));
            }
            return;
        }
        if let Some(target) = shown {
            self.dispatch(PointerEvent::leave(target, at));
        }
        if let Some(target) = hit {
            self.dispatch(PointerEvent::enter(target, at));
        }
    }

    /// Serializes the scene as SVG markup.
    pub fn to_svg_string(&self) -> String {
        self.scene.to_svg_string()
    }
}

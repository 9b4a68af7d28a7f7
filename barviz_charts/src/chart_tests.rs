// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::string::String;
use alloc::vec::Vec;

use approx::assert_abs_diff_eq;
use barviz_core::{NodeId, NodeKind, Scene};
use barviz_text::TextMeasurer;
use kurbo::{Point, Rect, Vec2};
use peniko::color::palette::css;

use crate::{
    AgeRow, BarChart, BarElement, ChartError, Container, DataPoint, LayoutContext, Margin,
    PointerEvent, StackedRow, TOOLTIP_CLASS, TooltipState, create_age_chart,
    create_category_chart, create_drug_charge_class_chart, create_drug_chart,
};

fn bar_rect(container: &Container, label_class: &str) -> Rect {
    let view = container.view().expect("chart mounted");
    let scene = view.scene();
    let id = scene
        .select_all(view.root(), label_class)
        .into_iter()
        .find(|id| scene.node(*id).is_some_and(|n| n.has_class("bar")))
        .expect("bar exists");
    scene
        .node(id)
        .and_then(|n| n.kind.as_rect())
        .expect("bar is a rect")
        .rect
}

fn tooltip_lines(container: &Container) -> Vec<String> {
    let view = container.view().expect("chart mounted");
    let scene = view.scene();
    scene
        .select_all(view.root(), TOOLTIP_CLASS)
        .into_iter()
        .flat_map(|tip| scene.descendants(tip))
        .filter_map(|id| scene.node(id)?.kind.as_text().cloned())
        .flat_map(|t| t.spans.into_iter().map(|s| s.text))
        .collect()
}

fn center(rect: Rect) -> Point {
    rect.center()
}

#[test]
fn simple_chart_scales_bars_by_value() {
    let mut container = Container::new(640.0);
    let data = [DataPoint::new("A", 10.0), DataPoint::new("B", 30.0)];
    BarChart::vertical()
        .render(&mut container, &data)
        .expect("valid chart");

    let a = bar_rect(&container, "a");
    let b = bar_rect(&container, "b");
    assert_abs_diff_eq!(b.height(), 3.0 * a.height(), epsilon = 1e-9);
    // Outer band padding keeps both bars off the plot edges.
    assert_abs_diff_eq!(a.x0, 27.0);
    assert_abs_diff_eq!(a.width(), 235.0);
    assert!(b.x1 < 550.0, "{b:?}");

    let view = container.view().expect("chart mounted");
    let layout = view.layout();
    assert_abs_diff_eq!(layout.value_scale.map(30.0), 0.0);
    assert_eq!(layout.label_scale.domain(), ["A", "B"]);
    assert_abs_diff_eq!(layout.inner_width(), 550.0);
    // ceil(550 / (16/9)) = 310, minus 50 of vertical margins.
    assert_abs_diff_eq!(layout.inner_height(), 260.0);

    let svg = container.to_svg_string();
    assert!(
        svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart-bar" width="640" height="310">"#
        ),
        "{svg}"
    );
    assert!(svg.contains(r#"<g transform="translate(60,20)">"#), "{svg}");
    assert!(svg.contains(r#"class="x axis" transform="translate(0,260)""#), "{svg}");
}

#[test]
fn hovering_a_bar_shows_and_hides_its_tooltip() {
    let mut container = Container::new(640.0);
    let data = [DataPoint::new("A", 10.0), DataPoint::new("B", 30.0)];
    create_category_chart(&mut container, &data).expect("valid chart");
    let a = bar_rect(&container, "a");

    let view = container.view_mut().expect("chart mounted");
    view.hover_at(Some(center(a)));
    assert!(
        matches!(view.tooltip_state(), TooltipState::Shown { .. }),
        "tooltip shown over the bar"
    );
    assert_eq!(tooltip_lines(&container), ["A", "10"]);

    let view = container.view_mut().expect("chart mounted");
    view.hover_at(Some(center(a) + Vec2::new(1.0, 1.0)));
    assert_eq!(tooltip_lines(&container).len(), 2, "moving keeps one tooltip");

    let view = container.view_mut().expect("chart mounted");
    view.hover_at(None);
    assert_eq!(view.tooltip_state(), TooltipState::Idle);
    assert!(tooltip_lines(&container).is_empty(), "tooltip removed");
}

#[test]
fn moving_between_bars_swaps_the_tooltip() {
    let mut container = Container::new(640.0);
    let data = [DataPoint::new("A", 10.0), DataPoint::new("B", 30.0)];
    create_category_chart(&mut container, &data).expect("valid chart");
    let a = bar_rect(&container, "a");
    let b = bar_rect(&container, "b");

    let view = container.view_mut().expect("chart mounted");
    view.hover_at(Some(center(a)));
    view.hover_at(Some(center(b)));
    assert_eq!(tooltip_lines(&container), ["B", "30"]);
}

#[test]
fn tooltip_flips_near_the_plot_edge() {
    let mut container = Container::new(640.0);
    let data = [DataPoint::new("A", 10.0), DataPoint::new("B", 30.0)];
    create_category_chart(&mut container, &data).expect("valid chart");

    let view = container.view_mut().expect("chart mounted");
    let target = view.hotspots()[1].node;
    let corner = Point::new(view.layout().inner_width() - 1.0, view.layout().inner_height() - 1.0);
    view.dispatch(PointerEvent::enter(target, corner));
    let TooltipState::Shown { tooltip, .. } = view.tooltip_state() else {
        panic!("tooltip should be shown");
    };
    let offset = view.scene().node(tooltip).expect("live").translate;
    assert!(offset.x < corner.x, "flipped left: {offset:?}");
    assert!(offset.y < corner.y, "flipped up: {offset:?}");
}

#[test]
fn drug_chart_reports_shares() {
    let mut container = Container::new(640.0);
    let data = [
        DataPoint::new("Heroin", 1.0),
        DataPoint::new("Cannabis", 7.0),
    ];
    create_drug_chart(&mut container, &data).expect("valid chart");

    let view = container.view_mut().expect("chart mounted");
    let heroin = view.hotspots()[0].clone();
    view.dispatch(PointerEvent::enter(heroin.node, heroin.bounds.center()));
    assert_eq!(tooltip_lines(&container), ["Heroin", "12.5%"]);
}

#[test]
fn horizontal_chart_wraps_long_labels() {
    let mut container = Container::new(640.0);
    let data = [
        DataPoint::new("Possession of Controlled Substance", 12.0),
        DataPoint::new("Theft", 4.0),
    ];
    BarChart::horizontal()
        .render(&mut container, &data)
        .expect("valid chart");

    let view = container.view().expect("chart mounted");
    let scene = view.scene();
    let y_axis = scene.select_all(view.root(), "y")[0];
    let line_counts: Vec<usize> = scene
        .select_text_in(y_axis, "tick")
        .into_iter()
        .filter_map(|id| scene.node(id)?.kind.as_text().map(|t| t.spans.len()))
        .collect();
    assert_eq!(line_counts, [2, 1]);

    // Value ticks on the x axis are left alone.
    let x_axis = scene.select_all(view.root(), "x")[0];
    for id in scene.select_text_in(x_axis, "tick") {
        let text = scene.node(id).and_then(|n| n.kind.as_text()).expect("text");
        assert!(text.spans.is_empty(), "x tick {:?} unwrapped", text.text);
    }
}

#[test]
fn stacked_chart_hovers_segments() {
    let mut container = Container::new(640.0);
    let rows = [
        StackedRow::new("Heroin", [("Class A", 3.0), ("Class B", 4.0)]),
        StackedRow::new("Cannabis", [("Class B", 2.0)]),
    ];
    create_drug_charge_class_chart(
        &mut container,
        &rows,
        ["Class A", "Class B"],
        [css::STEEL_BLUE, css::ORANGE],
    )
    .expect("valid chart");

    let view = container.view_mut().expect("chart mounted");
    assert_eq!(view.hotspots().len(), 3);
    assert_eq!(view.layout().value_scale.domain(), (0.0, 7.0));
    let second = view.hotspots()[1].clone();
    view.hover_at(Some(second.bounds.center()));
    assert_eq!(tooltip_lines(&container), ["Class B", "4"]);

    let svg = container.to_svg_string();
    assert!(svg.contains(r#"class="segment class-a class-a""#), "{svg}");
    assert!(svg.contains(r##"fill="#4682b4""##), "{svg}");
}

#[test]
fn stacked_chart_recomputes_stale_totals() {
    let mut container = Container::new(640.0);
    let mut row = StackedRow::new("Heroin", [("Class A", 3.0)]);
    row.total.value = 99.0;
    create_drug_charge_class_chart(&mut container, &[row], ["Class A"], [css::RED])
        .expect("totals are recomputed");
    let view = container.view().expect("chart mounted");
    assert_eq!(view.layout().value_scale.domain(), (0.0, 3.0));
}

#[test]
fn stacked_constructor_swaps_strategies() {
    let chart = BarChart::<StackedRow>::stacked_horizontal(["k"], [css::RED]);
    assert_eq!(chart.bar_element(), BarElement::Group);
    assert_eq!(chart.margin(), Margin::HORIZONTAL);
    assert_eq!(BarChart::<DataPoint>::horizontal().bar_element(), BarElement::Rect);
}

#[test]
fn age_chart_orders_brackets() {
    let mut container = Container::new(640.0);
    let rows = [
        AgeRow::invalid(1.0),
        AgeRow::new(Some(18), Some(25), 10.0),
        AgeRow::new(None, Some(18), 3.0),
    ];
    create_age_chart(&mut container, &rows).expect("valid chart");
    let view = container.view().expect("chart mounted");
    assert_eq!(view.layout().label_scale.domain(), ["<18", "18 - 25", "Unknown Age"]);
}

#[test]
fn all_zero_values_render() {
    let mut container = Container::new(640.0);
    let data = [DataPoint::new("A", 0.0), DataPoint::new("B", 0.0)];
    create_category_chart(&mut container, &data).expect("zero data is valid");
    assert_abs_diff_eq!(bar_rect(&container, "a").height(), 0.0);
}

#[test]
fn invalid_input_leaves_the_container_untouched() {
    let mut container = Container::new(640.0);
    let data = [DataPoint::new("A", 1.0)];
    create_category_chart(&mut container, &data).expect("valid chart");
    let before = container.to_svg_string();

    assert_eq!(
        create_category_chart(&mut container, &[]),
        Err(ChartError::EmptyData)
    );
    assert_eq!(
        create_category_chart(
            &mut container,
            &[DataPoint::new("A", 1.0), DataPoint::new("A", 2.0)]
        ),
        Err(ChartError::DuplicateLabel { label: "A".into() })
    );
    assert!(matches!(
        create_category_chart(&mut container, &[DataPoint::new("A", -1.0)]),
        Err(ChartError::InvalidValue { .. })
    ), "negative value");
    assert_eq!(container.to_svg_string(), before);

    let mut narrow = Container::new(f64::NAN);
    assert!(matches!(
        create_category_chart(&mut narrow, &data),
        Err(ChartError::InvalidContainerWidth { .. })
    ), "NaN width");
    assert!(narrow.view().is_none(), "nothing mounted");
}

#[test]
fn rerendering_replaces_the_previous_chart() {
    let mut container = Container::new(640.0);
    create_category_chart(&mut container, &[DataPoint::new("A", 1.0)]).expect("valid chart");
    let view = container.view_mut().expect("chart mounted");
    let a = view.hotspots()[0].bounds;
    view.hover_at(Some(a.center()));

    create_category_chart(&mut container, &[DataPoint::new("B", 1.0)]).expect("valid chart");
    let view = container.view().expect("chart mounted");
    assert_eq!(view.tooltip_state(), TooltipState::Idle);
    assert_eq!(view.scene().select_all(view.root(), "bar").len(), 1);
    assert!(!container.to_svg_string().contains(TOOLTIP_CLASS), "old tooltip gone");
}

#[test]
fn resizing_the_container_recomputes_the_layout() {
    let mut container = Container::new(640.0);
    let data = [DataPoint::new("A", 10.0), DataPoint::new("B", 30.0)];
    create_category_chart(&mut container, &data).expect("valid chart");
    let wide = bar_rect(&container, "a");

    container.set_width(480.0);
    create_category_chart(&mut container, &data).expect("valid chart");
    let view = container.view().expect("chart mounted");
    let layout = view.layout();
    assert_abs_diff_eq!(layout.inner_width(), 390.0);
    // ceil(390 / (16/9)) = 220, minus 50 of vertical margins.
    assert_abs_diff_eq!(layout.inner_height(), 170.0);
    assert_eq!(layout.label_scale.range(), (0.0, 390.0));
    assert_eq!(layout.value_scale.range(), (170.0, 0.0));

    let narrow = bar_rect(&container, "a");
    assert!(narrow.width() < wide.width(), "{narrow:?} vs {wide:?}");
    assert!(
        container
            .to_svg_string()
            .contains(r#"class="chart-bar" width="480" height="220""#),
        "outer size follows the new width"
    );
}

#[test]
fn hover_can_be_disabled() {
    let mut container = Container::new(640.0);
    BarChart::vertical()
        .with_hover(false)
        .render(&mut container, &[DataPoint::new("A", 1.0)])
        .expect("valid chart");
    let view = container.view_mut().expect("chart mounted");
    assert!(view.hotspots().is_empty(), "no bound bars");
    view.hover_at(Some(Point::new(10.0, 10.0)));
    assert_eq!(view.tooltip_state(), TooltipState::Idle);
}

#[test]
fn custom_post_render_hook_gets_the_root() {
    let mut container = Container::new(640.0);
    BarChart::vertical()
        .with_post_render(
            |scene: &mut Scene, root: NodeId, layout: &LayoutContext, _: &dyn TextMeasurer| {
                let note = scene.append(root, NodeKind::Group).expect("root exists");
                scene.set_class(note, "annotation");
                scene.set_translate(note, (layout.inner_width(), 0.0));
            },
        )
        .with_tooltip_label(|d| String::from("label: ") + &d.label)
        .render(&mut container, &[DataPoint::new("A", 1.0)])
        .expect("valid chart");

    let view = container.view_mut().expect("chart mounted");
    assert_eq!(view.scene().select_all(view.root(), "annotation").len(), 1);
    let a = view.hotspots()[0].bounds;
    view.hover_at(Some(a.center()));
    assert_eq!(tooltip_lines(&container)[0], "label: A");
}

#[test]
fn custom_margins_and_ratio_change_geometry() {
    let mut container = Container::new(500.0);
    BarChart::vertical()
        .with_margin(Margin::new(10.0, 10.0, 10.0, 10.0))
        .with_aspect_ratio(2.0)
        .render(&mut container, &[DataPoint::new("A", 1.0)])
        .expect("valid chart");
    let layout = container.view().expect("chart mounted").layout();
    assert_abs_diff_eq!(layout.inner_width(), 480.0);
    assert_abs_diff_eq!(layout.inner_height(), 220.0);
}

// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the preset charts from bundled JSON data to `barviz_charts_demo.html`.
//!
//! Each chart is shown with a simulated hover over its first bar so the
//! tooltip markup is visible in the report. Set `RUST_LOG=barviz_charts=trace`
//! to follow the render passes and tooltip transitions.

mod html;

use barviz_charts::{
    AgeRow, ChartError, Container, DataPoint, StackedRow, create_age_chart, create_category_chart,
    create_drug_charge_class_chart, create_drug_chart,
};
use peniko::color::palette::css;
use serde::de::DeserializeOwned;
use tracing::info;

/// Width of every demo container, in pixels.
const CONTAINER_WIDTH: f64 = 720.0;

const OUTPUT: &str = "barviz_charts_demo.html";

/// Stacking order for the charge class chart, most serious first.
const CHARGE_CLASSES: [&str; 6] = ["Class X", "Class 1", "Class 2", "Class 3", "Class 4", "Class A"];

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("invalid {name}: {source}")]
    Data {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot render {title}: {source}")]
    Chart {
        title: &'static str,
        #[source]
        source: ChartError,
    },
    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> Result<(), DemoError> {
    init_tracing();

    let sections = vec![
        category_demo()?,
        drug_demo()?,
        charge_class_demo()?,
        age_demo()?,
    ];

    let html = html::render_report("barviz charts demo", &sections);
    std::fs::write(OUTPUT, html)?;
    info!(path = OUTPUT, charts = sections.len(), "wrote report");
    Ok(())
}

fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .is_ok();
    if !installed {
        eprintln!("tracing subscriber already installed; keeping it");
    }
}

fn load<T: DeserializeOwned>(name: &'static str, json: &str) -> Result<Vec<T>, DemoError> {
    serde_json::from_str(json).map_err(|source| DemoError::Data { name, source })
}

/// Hovers the first bound bar, then serializes the chart.
fn hovered_svg(container: &mut Container) -> String {
    if let Some(view) = container.view_mut() {
        let first = view.hotspots().first().map(|h| h.bounds.center());
        view.hover_at(first);
    }
    container.to_svg_string()
}

fn section(
    title: &'static str,
    description: &'static str,
    render: impl FnOnce(&mut Container) -> Result<(), ChartError>,
) -> Result<html::HtmlSection, DemoError> {
    let mut container = Container::new(CONTAINER_WIDTH);
    render(&mut container).map_err(|source| DemoError::Chart { title, source })?;
    Ok(html::HtmlSection {
        title,
        description,
        svg: hovered_svg(&mut container),
    })
}

fn category_demo() -> Result<html::HtmlSection, DemoError> {
    let data: Vec<DataPoint> = load("categories.json", include_str!("../data/categories.json"))?;
    section(
        "Convictions by category",
        "Vertical bars; the tooltip shows the label and the raw count.",
        |c| create_category_chart(c, &data),
    )
}

fn drug_demo() -> Result<html::HtmlSection, DemoError> {
    let data: Vec<DataPoint> = load("drugs.json", include_str!("../data/drugs.json"))?;
    section(
        "Drug convictions by drug type",
        "Horizontal bars with wrapped labels; the tooltip shows each drug's share of the total.",
        |c| create_drug_chart(c, &data),
    )
}

fn charge_class_demo() -> Result<html::HtmlSection, DemoError> {
    let rows: Vec<StackedRow> = load(
        "drug_charge_classes.json",
        include_str!("../data/drug_charge_classes.json"),
    )?;
    let palette = [
        css::DARK_RED,
        css::FIREBRICK,
        css::CHOCOLATE,
        css::ORANGE,
        css::GOLDENROD,
        css::STEEL_BLUE,
    ];
    section(
        "Drug convictions by charge class",
        "Stacked horizontal bars; each segment is a charge class and has its own tooltip. \
         Missing or stale totals are recomputed from the segments.",
        |c| create_drug_charge_class_chart(c, &rows, CHARGE_CLASSES, palette),
    )
}

fn age_demo() -> Result<html::HtmlSection, DemoError> {
    let rows: Vec<AgeRow> = load("ages.json", include_str!("../data/ages.json"))?;
    section(
        "Convictions by age",
        "Age brackets sorted by lower bound, with unknown ages last.",
        |c| create_age_chart(c, &rows),
    )
}

// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-page HTML report around inline SVG charts.

/// One chart in the report.
#[derive(Debug)]
pub(crate) struct HtmlSection {
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
    pub(crate) svg: String,
}

/// Charts only emit classes; this gives them their look.
const STYLESHEET: &str = r"
body { font-family: sans-serif; margin: 2em; color: #222; }
section { margin-bottom: 3em; }
p { color: #555; max-width: 60em; }
.chart-bar { overflow: visible; }
.chart-bar .bar { fill: steelblue; }
.chart-bar .bar:hover { fill: #2b5d86; }
.chart-bar .segment:hover { opacity: 0.8; }
.axis text { font-size: 10px; }
.axis path, .axis line { fill: none; stroke: #000; shape-rendering: crispEdges; }
.tooltip-chart { pointer-events: none; }
.tooltip-chart rect { fill: #fff; stroke: #999; }
.tooltip-chart .label { font-weight: bold; }
";

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str("<style>");
    out.push_str(STYLESHEET);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    for section in sections {
        out.push_str("<section>\n");
        out.push_str(&format!("<h2>{}</h2>\n", escape_html(section.title)));
        out.push_str(&format!("<p>{}</p>\n", escape_html(section.description)));
        out.push_str(&section.svg);
        out.push_str("</section>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

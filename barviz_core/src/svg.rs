// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};

use kurbo::{BezPath, PathEl, Vec2};
use peniko::Brush;

use crate::node::{Node, NodeKind, Stroke, TextNode};
use crate::{NodeId, Scene};

impl Scene {
    /// Serializes the tree below the root as SVG markup.
    ///
    /// Returns an empty string for an empty scene.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root() {
            self.write_node(&mut out, root, 0);
        }
        out
    }

    /// Serializes the subtree rooted at `id` as SVG markup.
    pub fn node_to_svg_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, 0);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, depth: usize) {
        let Some(node) = self.node(id) else {
            return;
        };
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push('<');
        out.push_str(node.kind.tag());
        if matches!(node.kind, NodeKind::Svg(_)) {
            out.push_str(r#" xmlns="http://www.w3.org/2000/svg""#);
        }
        write_common_attrs(out, node);

        match &node.kind {
            NodeKind::Svg(svg) => {
                out.push_str(&format!(
                    r#" width="{}" height="{}">"#,
                    num(svg.width),
                    num(svg.height)
                ));
                self.write_children(out, node, depth);
                out.push_str("</svg>\n");
            }
            NodeKind::Group => {
                if node.children.is_empty() {
                    out.push_str("/>\n");
                } else {
                    out.push('>');
                    self.write_children(out, node, depth);
                    out.push_str("</g>\n");
                }
            }
            NodeKind::Rect(r) => {
                out.push_str(&format!(
                    r#" x="{}" y="{}" width="{}" height="{}""#,
                    num(r.rect.x0),
                    num(r.rect.y0),
                    num(r.rect.width()),
                    num(r.rect.height()),
                ));
                if let Some(fill) = &r.fill {
                    write_paint_attr(out, "fill", fill);
                }
                write_stroke(out, r.stroke.as_ref());
                out.push_str("/>\n");
            }
            NodeKind::Line(l) => {
                out.push_str(&format!(
                    r#" x1="{}" y1="{}" x2="{}" y2="{}""#,
                    num(l.line.p0.x),
                    num(l.line.p0.y),
                    num(l.line.p1.x),
                    num(l.line.p1.y),
                ));
                write_stroke(out, l.stroke.as_ref());
                out.push_str("/>\n");
            }
            NodeKind::Path(p) => {
                out.push_str(&format!(r#" d="{}" fill="none""#, path_data(&p.path)));
                write_stroke(out, p.stroke.as_ref());
                out.push_str("/>\n");
            }
            NodeKind::Text(t) => {
                write_text(out, t);
                out.push('\n');
            }
        }
    }

    fn write_children(&self, out: &mut String, node: &Node, depth: usize) {
        out.push('\n');
        for child in &node.children {
            self.write_node(out, *child, depth + 1);
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
    }
}

fn write_common_attrs(out: &mut String, node: &Node) {
    if !node.classes.is_empty() {
        out.push_str(&format!(r#" class="{}""#, escape_xml(&node.class_attr())));
    }
    if node.translate != Vec2::ZERO {
        out.push_str(&format!(
            r#" transform="translate({},{})""#,
            num(node.translate.x),
            num(node.translate.y)
        ));
    }
}

fn write_text(out: &mut String, t: &TextNode) {
    out.push_str(&format!(r#" x="{}" y="{}""#, num(t.x), num(t.y)));
    if t.dx_em != 0.0 {
        out.push_str(&format!(r#" dx="{}em""#, num(t.dx_em)));
    }
    if t.dy_em != 0.0 {
        out.push_str(&format!(r#" dy="{}em""#, num(t.dy_em)));
    }
    out.push_str(&format!(
        r#" text-anchor="{}" font-size="{}""#,
        t.anchor.as_svg(),
        num(t.font_size)
    ));
    if let Some(fill) = &t.fill {
        write_paint_attr(out, "fill", fill);
    }
    out.push('>');

    if t.spans.is_empty() {
        out.push_str(&escape_xml(&t.text));
    }
    for span in &t.spans {
        out.push_str("<tspan");
        if let Some(class) = &span.class {
            out.push_str(&format!(r#" class="{}""#, escape_xml(class)));
        }
        if let Some(x) = span.x {
            out.push_str(&format!(r#" x="{}""#, num(x)));
        }
        if let Some(y) = span.y {
            out.push_str(&format!(r#" y="{}""#, num(y)));
        }
        if span.dx_em != 0.0 {
            out.push_str(&format!(r#" dx="{}em""#, num(span.dx_em)));
        }
        if span.dy_em != 0.0 {
            out.push_str(&format!(r#" dy="{}em""#, num(span.dy_em)));
        }
        out.push('>');
        out.push_str(&escape_xml(&span.text));
        out.push_str("</tspan>");
    }
    out.push_str("</text>");
}

fn write_stroke(out: &mut String, stroke: Option<&Stroke>) {
    if let Some(stroke) = stroke {
        write_paint_attr(out, "stroke", &stroke.brush);
        out.push_str(&format!(r#" stroke-width="{}""#, num(stroke.width)));
    }
}

fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        let seg = match el {
            PathEl::MoveTo(p) => format!("M{},{}", num(p.x), num(p.y)),
            PathEl::LineTo(p) => format!("L{},{}", num(p.x), num(p.y)),
            PathEl::QuadTo(p1, p2) => {
                format!("Q{},{},{},{}", num(p1.x), num(p1.y), num(p2.x), num(p2.y))
            }
            PathEl::CurveTo(p1, p2, p3) => format!(
                "C{},{},{},{},{},{}",
                num(p1.x),
                num(p1.y),
                num(p2.x),
                num(p2.y),
                num(p3.x),
                num(p3.y)
            ),
            PathEl::ClosePath => "Z".to_string(),
        };
        d.push_str(&seg);
    }
    d
}

/// Formats a coordinate without a trailing `.0` and without negative zero.
fn num(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

//! SVG generation

use std::fmt::Write as _;

use super::scene::{Category, Node, Scene};
use crate::layout::Layout;

/// Serialize `scene` on the surface described by `layout`.
///
/// The layout's viewBox string is the literal coordinate system of the
/// root element, and every element is drawn inside one group translated to
/// the gauge center.
pub fn render_svg(scene: &Scene, layout: &Layout) -> String {
    let vb = &layout.view_box;
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" class="gauge""#);
    let _ = write!(
        &mut out,
        r#" width="{}" height="{}" viewBox="{} {} {} {}""#,
        fmt_num(vb.width),
        fmt_num(vb.height),
        fmt_num(vb.x),
        fmt_num(vb.y),
        fmt_num(vb.width),
        fmt_num(vb.height),
    );
    if !scene.is_visible() {
        out.push_str(r#" style="opacity: 0""#);
    } else if scene.opacity() < 1.0 {
        let _ = write!(&mut out, r#" style="opacity: {}""#, fmt_num(scene.opacity()));
    }
    out.push('>');

    let c = layout.doughnut_transform;
    let _ = write!(
        &mut out,
        r#"<g class="doughnut" transform="translate({}, {})">"#,
        fmt_num(c.x),
        fmt_num(c.y)
    );
    for category in Category::ALL {
        let _ = write!(&mut out, r#"<g class="{}">"#, category.class());
        for element in scene.by_category(category) {
            write_node(&mut out, &element.node);
        }
        out.push_str("</g>");
    }
    out.push_str("</g></svg>");
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Path { d, fill, .. } => {
            let _ = write!(out, r#"<path d="{}" fill="{}"/>"#, d, escape_attr(fill));
        }
        Node::Circle {
            center,
            radius,
            fill,
        } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(*radius),
                escape_attr(fill)
            );
        }
        Node::Line {
            from,
            to,
            stroke,
            width,
        } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                fmt_num(from.x),
                fmt_num(from.y),
                fmt_num(to.x),
                fmt_num(to.y),
                escape_attr(stroke),
                fmt_num(*width)
            );
        }
        Node::Text {
            position,
            text,
            font_size,
            fill,
            anchor,
        } => {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}">{}</text>"#,
                fmt_num(position.x),
                fmt_num(position.y),
                fmt_num(*font_size),
                escape_attr(fill),
                anchor.as_str(),
                escape_xml(text)
            );
        }
        Node::Group(children) => {
            out.push_str("<g>");
            for child in children {
                write_node(out, child);
            }
            out.push_str("</g>");
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    // Trigonometric residue such as cos(pi/2) prints as 0
    if value.abs() < 1e-9 || !value.is_finite() {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        &s
    };
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaugeType;
    use crate::layout::calculate_gauge_layout;
    use crate::types::Point;

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(240.0), "240");
        assert_eq!(fmt_num(132.5), "132.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333333");
        assert_eq!(fmt_num(-0.0000001), "-0.0000001");
        assert_eq!(fmt_num(1234.56789), "1234.57");
        assert_eq!(fmt_num(f64::NAN), "0");
        assert_eq!(fmt_num(-6.1e-15), "0");
    }

    #[test]
    fn text_is_escaped() {
        let mut out = String::new();
        write_node(
            &mut out,
            &Node::Text {
                position: Point::ORIGIN,
                text: "<&".into(),
                font_size: 9.0,
                fill: "red".into(),
                anchor: Default::default(),
            },
        );
        insta::assert_snapshot!(
            out,
            @r#"<text x="0" y="0" font-size="9" fill="red" text-anchor="middle">&lt;&amp;</text>"#
        );
    }

    #[test]
    fn hidden_scene_sets_opacity_zero() {
        let layout = calculate_gauge_layout(200.0, 100.0, GaugeType::Semicircle, 0.2, 0.0);
        let svg = render_svg(&Scene::hidden(), &layout);
        assert!(svg.contains(r#"style="opacity: 0""#));
        assert!(!render_svg(&Scene::new(), &layout).contains("opacity"));
    }

    #[test]
    fn empty_scene_structure() {
        let layout = calculate_gauge_layout(240.0, 132.5, GaugeType::Semicircle, 0.2, 0.0);
        let svg = render_svg(&Scene::new(), &layout);
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(concat!(
            r#"<g class="arcs"></g><g class="ticks"></g>"#,
            r#"<g class="pointers"></g><g class="value-label"></g>"#,
        )));
        assert!(svg.ends_with("</g></svg>"));
    }
}

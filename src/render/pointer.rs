//! Pointer shapes.

use std::f64::consts::FRAC_PI_2;

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use super::arc::{angle_for_percent, polar};
use super::scene::Node;
use super::svg::fmt_num;
use crate::config::{GaugeType, PointerConfig, PointerType};
use crate::layout::{Layout, tick_scale_factor};
use crate::types::{BoundsBuilder, Point};

/// Gap between an arrow tip and the inner edge of the arc, before scaling
const ARROW_GAP: f64 = 2.0;
/// Blob highlight radius relative to the blob
const BLOB_CORE: f64 = 0.6;

/// Where a pointer is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGeometry {
    pub angle: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Decoration scale, see [`tick_scale_factor`]
    pub scale: f64,
}

impl PointerGeometry {
    pub fn new(layout: &Layout, gauge_type: GaugeType, percent: f64) -> Self {
        Self {
            angle: angle_for_percent(gauge_type, percent),
            outer_radius: layout.outer_radius,
            inner_radius: layout.inner_radius,
            scale: tick_scale_factor(layout.outer_radius),
        }
    }
}

#[enum_dispatch]
pub trait PointerShape {
    /// Node for the pointer, relative to the gauge center
    fn draw(&self, geometry: &PointerGeometry) -> Node;

    /// Whether the shape is drawn as a path
    fn draws_path(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeedleShape {
    /// Fraction of the outer radius
    pub length: f64,
    pub width: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlobShape {
    pub width: f64,
    pub color: String,
    pub base_color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowShape {
    pub width: f64,
    pub color: String,
}

#[enum_dispatch(PointerShape)]
#[derive(Debug, Clone, PartialEq)]
pub enum PointerDrawer {
    Needle(NeedleShape),
    Blob(BlobShape),
    Arrow(ArrowShape),
}

impl PointerDrawer {
    pub fn from_config(config: &PointerConfig) -> Self {
        match config.pointer_type {
            PointerType::Needle => NeedleShape {
                length: config.length,
                width: config.width,
                color: config.color.clone(),
            }
            .into(),
            PointerType::Blob => BlobShape {
                width: config.width,
                color: config.color.clone(),
                base_color: config.base_color.clone(),
            }
            .into(),
            PointerType::Arrow => ArrowShape {
                width: config.width,
                color: config.color.clone(),
            }
            .into(),
        }
    }
}

/// Closed triangle path and its extent
fn triangle(points: [DVec2; 3], fill: &str) -> Node {
    let mut bounds = BoundsBuilder::new();
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        bounds.expand_point((*p).into());
        d.push_str(if i == 0 { "M " } else { " L " });
        d.push_str(&fmt_num(p.x));
        d.push(' ');
        d.push_str(&fmt_num(p.y));
    }
    d.push_str(" Z");
    Node::Path {
        d,
        fill: fill.to_string(),
        bounds: bounds
            .build()
            .unwrap_or_else(|| crate::types::Bounds::new(0.0, 0.0, 0.0, 0.0)),
    }
}

impl PointerShape for NeedleShape {
    fn draw(&self, g: &PointerGeometry) -> Node {
        let half = (self.width * g.scale / 2.0).max(0.0);
        let tip = polar(g.outer_radius * self.length.max(0.0), g.angle);
        let left = polar(half, g.angle - FRAC_PI_2);
        let right = polar(half, g.angle + FRAC_PI_2);
        Node::Group(vec![
            triangle([left, tip, right], &self.color),
            Node::Circle {
                center: Point::ORIGIN,
                radius: half,
                fill: self.color.clone(),
            },
        ])
    }
}

impl PointerShape for BlobShape {
    fn draw(&self, g: &PointerGeometry) -> Node {
        let radius = (self.width * g.scale / 2.0).max(0.0);
        let center: Point = polar((g.outer_radius + g.inner_radius) / 2.0, g.angle).into();
        Node::Group(vec![
            Node::Circle {
                center,
                radius,
                fill: self.color.clone(),
            },
            Node::Circle {
                center,
                radius: radius * BLOB_CORE,
                fill: self.base_color.clone(),
            },
        ])
    }

    fn draws_path(&self) -> bool {
        false
    }
}

impl PointerShape for ArrowShape {
    fn draw(&self, g: &PointerGeometry) -> Node {
        let size = (self.width * g.scale).max(0.0);
        let tip_r = (g.inner_radius - ARROW_GAP * g.scale).max(0.0);
        let base_r = (tip_r - size).max(0.0);
        let tip = polar(tip_r, g.angle);
        let base = polar(base_r, g.angle);
        let left = base + polar(size / 2.0, g.angle - FRAC_PI_2);
        let right = base + polar(size / 2.0, g.angle + FRAC_PI_2);
        triangle([left, tip, right], &self.color)
    }
}

/// Draw one pointer at `percent`. Returns the node and the path string
/// kept in the pointer's animation context (empty for shapes drawn without
/// a path).
pub fn pointer_node(
    config: &PointerConfig,
    layout: &Layout,
    gauge_type: GaugeType,
    percent: f64,
) -> (Node, String) {
    if config.hide {
        return (Node::Group(Vec::new()), String::new());
    }
    let drawer = PointerDrawer::from_config(config);
    let node = drawer.draw(&PointerGeometry::new(layout, gauge_type, percent));
    let path = if drawer.draws_path() { first_path(&node) } else { String::new() };
    (node, path)
}

fn first_path(node: &Node) -> String {
    match node {
        Node::Path { d, .. } => d.clone(),
        Node::Group(children) => children
            .iter()
            .map(first_path)
            .find(|d| !d.is_empty())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

//! Content measurement.
//!
//! The refiner needs the true extent of what was drawn. A rendering surface
//! that can measure (a browser's bounding box query, a font shaper) plugs in
//! through [`Measure`]; [`SceneMeasurer`] estimates it analytically from the
//! scene with the same text metrics the padding model uses.

use super::scene::{Node, Scene, TextAnchor};
use crate::layout::padding::{GLYPH_WIDTH, LINE_HEIGHT};
use crate::types::{Bounds, BoundsBuilder, Point, Size};

/// Share of the line height above the baseline
const ASCENT: f64 = 1.0;

/// Measures the content of a drawn scene, relative to the gauge center.
///
/// Returns `None` when nothing measurable was drawn.
pub trait Measure {
    fn measure(&mut self, scene: &Scene) -> Option<Bounds>;
}

impl<F> Measure for F
where
    F: FnMut(&Scene) -> Option<Bounds>,
{
    fn measure(&mut self, scene: &Scene) -> Option<Bounds> {
        self(scene)
    }
}

/// Analytic measurement of scene nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneMeasurer;

impl Measure for SceneMeasurer {
    fn measure(&mut self, scene: &Scene) -> Option<Bounds> {
        let mut builder = BoundsBuilder::new();
        for element in scene.elements() {
            expand_node(&mut builder, &element.node);
        }
        builder.build()
    }
}

/// Estimated box of a text run
pub fn text_bounds(position: Point, text: &str, font_size: f64, anchor: TextAnchor) -> Bounds {
    let width = text.chars().count() as f64 * font_size * GLYPH_WIDTH;
    let left = match anchor {
        TextAnchor::Start => position.x,
        TextAnchor::Middle => position.x - width / 2.0,
        TextAnchor::End => position.x - width,
    };
    let top = position.y - font_size * ASCENT;
    Bounds::new(left, top, width, font_size * LINE_HEIGHT)
}

pub fn expand_node(builder: &mut BoundsBuilder, node: &Node) {
    match node {
        Node::Path { bounds, .. } => {
            builder.expand_point(bounds.min());
            builder.expand_point(bounds.max());
        }
        Node::Circle { center, radius, .. } => {
            builder.expand_rect(*center, Size::new(2.0 * radius, 2.0 * radius));
        }
        Node::Line {
            from, to, width, ..
        } => {
            let w = Size::new(*width, *width);
            builder.expand_rect(*from, w);
            builder.expand_rect(*to, w);
        }
        Node::Text {
            position,
            text,
            font_size,
            anchor,
            ..
        } => {
            if !text.is_empty() {
                let b = text_bounds(*position, text, *font_size, *anchor);
                builder.expand_point(b.min());
                builder.expand_point(b.max());
            }
        }
        Node::Group(children) => {
            for child in children {
                expand_node(builder, child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::Category;

    #[test]
    fn empty_scene_has_no_bounds() {
        assert_eq!(SceneMeasurer.measure(&Scene::new()), None);
    }

    #[test]
    fn text_anchor_shifts_box() {
        let p = Point::new(10.0, 0.0);
        let start = text_bounds(p, "100", 10.0, TextAnchor::Start);
        let end = text_bounds(p, "100", 10.0, TextAnchor::End);
        assert!((start.x - 10.0).abs() < 1e-9);
        assert!((end.x + end.width - 10.0).abs() < 1e-9);
        assert!((start.width - 18.0).abs() < 1e-9);
        assert!((start.height - 12.0).abs() < 1e-9);
    }

    #[test]
    fn measures_union_of_nodes() {
        let mut scene = Scene::new();
        scene.create(
            Category::Arcs,
            0,
            Node::Circle {
                center: Point::ORIGIN,
                radius: 50.0,
                fill: "#000".into(),
            },
        );
        scene.create(
            Category::Ticks,
            0,
            Node::Group(vec![Node::Line {
                from: Point::new(0.0, -60.0),
                to: Point::new(0.0, -70.0),
                stroke: "#000".into(),
                width: 2.0,
            }]),
        );
        let b = SceneMeasurer.measure(&scene).unwrap();
        assert!((b.x + 50.0).abs() < 1e-9);
        assert!((b.y + 71.0).abs() < 1e-9);
        assert!((b.height - 121.0).abs() < 1e-9);
    }

    #[test]
    fn closures_measure_too() {
        let fixed = Bounds::new(-1.0, -1.0, 2.0, 2.0);
        let mut m = |_: &Scene| Some(fixed);
        assert_eq!(m.measure(&Scene::new()), Some(fixed));
    }
}

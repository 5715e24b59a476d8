//! Tick marks and tick labels.

use super::arc::{angle_for_percent, polar};
use super::scene::{Node, TextAnchor};
use crate::config::{
    GaugeProps, TickLineConfig, TickType, TickValueConfig, format_value, percent_of,
};
use crate::layout::padding::{LABEL_GAP, LINE_HEIGHT};
use crate::layout::{Layout, tick_scale_factor};
use crate::types::Point;

/// Horizontal direction below which a label counts as centered on the
/// vertical axis
const CENTERED_SIN: f64 = 0.1;
/// Baseline offset of a vertically centered label, relative to font size
const BASELINE_SHIFT: f64 = 0.4;

/// One tick to draw
#[derive(Debug, Clone, PartialEq)]
pub struct TickMark<'a> {
    pub value: f64,
    pub line: &'a TickLineConfig,
    pub label: &'a TickValueConfig,
}

/// Values that get a tick: the explicit ticks, sub-arc limits flagged with
/// `show_tick`, and min/max unless hidden. Sorted, in range, no duplicates.
pub fn tick_values(props: &GaugeProps) -> Vec<f64> {
    tick_marks(props).iter().map(|t| t.value).collect()
}

pub fn tick_marks(props: &GaugeProps) -> Vec<TickMark<'_>> {
    let labels = &props.labels.tick_labels;
    let (min, max) = (props.min_value, props.max_value);
    let in_range = |v: f64| v.is_finite() && v >= min && v <= max;

    let mut marks: Vec<TickMark<'_>> = Vec::new();

    for tick in &labels.ticks {
        if in_range(tick.value) {
            marks.push(TickMark {
                value: tick.value,
                line: tick.line_config.as_ref().unwrap_or(&labels.default_tick_line),
                label: tick.value_config.as_ref().unwrap_or(&labels.default_tick_value),
            });
        }
    }
    for sub in &props.arc.sub_arcs {
        if let Some(limit) = sub.limit.filter(|l| sub.show_tick && in_range(*l)) {
            marks.push(TickMark {
                value: limit,
                line: &labels.default_tick_line,
                label: &labels.default_tick_value,
            });
        }
    }
    if !labels.hide_min_max {
        for v in [min, max] {
            if v.is_finite() {
                marks.push(TickMark {
                    value: v,
                    line: &labels.default_tick_line,
                    label: &labels.default_tick_value,
                });
            }
        }
    }

    // Explicit ticks come first, so their configs win on duplicates
    let mut unique: Vec<TickMark<'_>> = Vec::with_capacity(marks.len());
    for mark in marks {
        if !unique.iter().any(|u| (u.value - mark.value).abs() < 1e-9) {
            unique.push(mark);
        }
    }
    unique.sort_by(|a, b| a.value.total_cmp(&b.value));
    unique
}

/// Horizontal anchor for a label at `angle`, mirrored for inner labels
fn anchor_for(angle: f64, outward: bool) -> TextAnchor {
    let s = angle.sin();
    if s.abs() < CENTERED_SIN {
        TextAnchor::Middle
    } else if (s > 0.0) == outward {
        TextAnchor::Start
    } else {
        TextAnchor::End
    }
}

/// One group per tick: its line (unless hidden) and its label (unless hidden)
pub fn tick_nodes(props: &GaugeProps, layout: &Layout) -> Vec<Node> {
    let tick_type = props.labels.tick_labels.tick_type;
    let scale = tick_scale_factor(layout.outer_radius);
    let outward = tick_type == TickType::Outer;
    let sign = if outward { 1.0 } else { -1.0 };
    let edge = if outward {
        layout.outer_radius
    } else {
        layout.inner_radius
    };

    tick_marks(props)
        .into_iter()
        .map(|mark| {
            let angle = angle_for_percent(
                props.gauge_type,
                percent_of(mark.value, props.min_value, props.max_value),
            );
            let near = (edge + sign * mark.line.distance_from_arc * scale).max(0.0);
            let far = (near + sign * mark.line.length * scale).max(0.0);

            let mut children = Vec::with_capacity(2);
            if !mark.line.hide {
                children.push(Node::Line {
                    from: polar(near, angle).into(),
                    to: polar(far, angle).into(),
                    stroke: mark.line.color.clone(),
                    width: mark.line.width * scale,
                });
            }
            if !mark.label.hide {
                let font = mark.label.font_size * scale;
                let label_r = (far + sign * LABEL_GAP * scale).max(0.0);
                let p = polar(label_r, angle);
                // Push the label box away from the line vertically
                let center_y = p.y - sign * angle.cos() * font * LINE_HEIGHT / 2.0;
                children.push(Node::Text {
                    position: Point::new(p.x, center_y + font * BASELINE_SHIFT),
                    text: format_value(mark.value, mark.label.max_decimal_digits),
                    font_size: font,
                    fill: mark.label.color.clone(),
                    anchor: anchor_for(angle, outward),
                });
            }
            Node::Group(children)
        })
        .collect()
}

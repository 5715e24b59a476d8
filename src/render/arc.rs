//! Arc band drawing.
//!
//! Angles are radians measured clockwise from 12 o'clock, so a point at
//! angle `a` and radius `r` sits at `(r sin a, -r cos a)` relative to the
//! gauge center (SVG y grows downward).

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;

use super::scene::Node;
use super::svg::fmt_num;
use crate::config::{GaugeProps, GaugeType, percent_of};
use crate::layout::Layout;
use crate::types::{Bounds, BoundsBuilder};

/// Point at `radius` and `angle` around the center
pub fn polar(radius: f64, angle: f64) -> DVec2 {
    DVec2::new(radius * angle.sin(), -radius * angle.cos())
}

/// Angle of `percent` (0..=1) along the arc of `gauge_type`
pub fn angle_for_percent(gauge_type: GaugeType, percent: f64) -> f64 {
    let (start, end) = gauge_type.angles();
    start + (end - start) * percent.clamp(0.0, 1.0)
}

/// One colored band of the arc
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: String,
}

/// Expand the arc config into angular segments, with `arc.padding`
/// radians of gap at each boundary between neighbours.
pub fn arc_segments(props: &GaugeProps) -> Vec<ArcSegment> {
    let (min, max) = (props.min_value, props.max_value);
    let bands = props.arc.segments(min, max);
    let count = bands.len();
    let half_pad = props.arc.padding.max(0.0) / 2.0;

    bands
        .into_iter()
        .enumerate()
        .map(|(i, (from, to, color))| {
            let mut start = angle_for_percent(props.gauge_type, percent_of(from, min, max));
            let mut end = angle_for_percent(props.gauge_type, percent_of(to, min, max));
            let lead = if i > 0 { half_pad } else { 0.0 };
            let trail = if i + 1 < count { half_pad } else { 0.0 };
            if end - start > lead + trail {
                start += lead;
                end -= trail;
            }
            ArcSegment {
                start_angle: start,
                end_angle: end,
                color,
            }
        })
        .collect()
}

/// Exact extent of the annular sector between `inner` and `outer` radii
pub fn sector_bounds(outer: f64, inner: f64, start: f64, end: f64) -> Bounds {
    let mut builder = BoundsBuilder::new();
    let mut angles = vec![start, end];
    // Axis-aligned extremes sit on multiples of a quarter turn
    let mut k = (start / FRAC_PI_2).ceil();
    while k * FRAC_PI_2 < end {
        angles.push(k * FRAC_PI_2);
        k += 1.0;
    }
    for a in angles {
        builder.expand_point(polar(outer, a).into());
        builder.expand_point(polar(inner, a).into());
    }
    builder
        .build()
        .unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0))
}

/// SVG path for the annular sector from `start` to `end`
pub fn sector_path(outer: f64, inner: f64, start: f64, end: f64) -> String {
    let large = if end - start > PI { 1 } else { 0 };
    let o0 = polar(outer, start);
    let o1 = polar(outer, end);
    let mut d = format!(
        "M {} {} A {} {} 0 {} 1 {} {}",
        fmt_num(o0.x),
        fmt_num(o0.y),
        fmt_num(outer),
        fmt_num(outer),
        large,
        fmt_num(o1.x),
        fmt_num(o1.y)
    );
    if inner > 0.0 {
        let i1 = polar(inner, end);
        let i0 = polar(inner, start);
        d.push_str(&format!(
            " L {} {} A {} {} 0 {} 0 {} {} Z",
            fmt_num(i1.x),
            fmt_num(i1.y),
            fmt_num(inner),
            fmt_num(inner),
            large,
            fmt_num(i0.x),
            fmt_num(i0.y)
        ));
    } else {
        d.push_str(" L 0 0 Z");
    }
    d
}

/// One path node per arc segment
pub fn arc_nodes(props: &GaugeProps, layout: &Layout) -> Vec<Node> {
    let (outer, inner) = (layout.outer_radius, layout.inner_radius);
    arc_segments(props)
        .into_iter()
        .map(|seg| Node::Path {
            d: sector_path(outer, inner, seg.start_angle, seg.end_angle),
            fill: seg.color,
            bounds: sector_bounds(outer, inner, seg.start_angle, seg.end_angle),
        })
        .collect()
}

/// Color of the band containing `value`
pub fn color_at(props: &GaugeProps, value: f64) -> Option<String> {
    let bands = props.arc.segments(props.min_value, props.max_value);
    bands
        .iter()
        .find(|(from, to, _)| value >= *from && value <= *to)
        .or_else(|| bands.last())
        .map(|(_, _, color)| color.clone())
}

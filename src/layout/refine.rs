//! Second-pass refit from measured content bounds.
//!
//! The first pass draws with generous padding so nothing can be clipped.
//! Once the drawn content is measured, this module scales the gauge so the
//! true extents fill the container.

use super::{Layout, inner_radius};
use crate::config::GaugeType;
use crate::errors::GeometryError;
use crate::types::{Bounds, Point, Size, ViewBox};

/// Safety margin around measured content, as a fraction of the smaller
/// container dimension.
const SAFETY_MARGIN_FRACTION: f64 = 0.03;
/// Lower bound on that margin, in viewBox units
const SAFETY_MARGIN_FLOOR: f64 = 2.0;

fn safety_margin(container: Size) -> f64 {
    (container.min_dim() * SAFETY_MARGIN_FRACTION).max(SAFETY_MARGIN_FLOOR)
}

fn check_bounds(measured: &Bounds) -> Result<(), GeometryError> {
    let fields = [
        ("x", measured.x),
        ("y", measured.y),
        ("width", measured.width),
        ("height", measured.height),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(GeometryError::InvalidBounds { field, value });
        }
    }
    if measured.width <= 0.0 {
        return Err(GeometryError::InvalidBounds {
            field: "width",
            value: measured.width,
        });
    }
    if measured.height <= 0.0 {
        return Err(GeometryError::InvalidBounds {
            field: "height",
            value: measured.height,
        });
    }
    Ok(())
}

/// Refit `current_layout` so the measured content fills the container.
///
/// `measured_bounds` is relative to the gauge center (so `x`/`y` are usually
/// negative). The measured extents are unioned with the arc's own footprint,
/// made symmetric left/right so the gauge stays centered, and padded by a
/// safety margin. One uniform scale factor then maps everything into the
/// container, and the radius scales by the same factor.
pub fn calculate_layout_from_measured_bounds(
    container_width: f64,
    container_height: f64,
    measured_bounds: Bounds,
    gauge_type: GaugeType,
    arc_width: f64,
    current_layout: &Layout,
) -> Result<Layout, GeometryError> {
    check_bounds(&measured_bounds)?;
    let container = super::sanitize_container(container_width, container_height);
    let radius = current_layout.outer_radius;

    // The arc itself is always part of the content, even if the
    // measurement missed it.
    let left = (-measured_bounds.x).max(radius);
    let right = (measured_bounds.x + measured_bounds.width).max(radius);
    let top = (-measured_bounds.y).max(radius);
    let bottom = (measured_bounds.y + measured_bounds.height)
        .max(radius * gauge_type.arc_bottom_extent());

    let max_side_extent = left.max(right);
    let margin = safety_margin(container);

    let content_width = 2.0 * max_side_extent + 2.0 * margin;
    let content_height = top + bottom + 2.0 * margin;

    let scale = (container.width / content_width).min(container.height / content_height);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GeometryError::InvalidBounds {
            field: "scale",
            value: scale,
        });
    }

    let outer_radius = radius * scale;
    let view_box = ViewBox::new(0.0, 0.0, content_width * scale, content_height * scale);
    let gauge_center = Point::new(view_box.width / 2.0, (top + margin) * scale);

    crate::log::debug!(
        scale,
        outer_radius,
        content_width,
        content_height,
        "refit from measured bounds"
    );

    Ok(Layout {
        view_box,
        outer_radius,
        inner_radius: inner_radius(outer_radius, arc_width),
        gauge_center,
        doughnut_transform: gauge_center,
    })
}

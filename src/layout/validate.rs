//! Geometry validation.
//!
//! Container measurement races (an element not laid out yet) are expected,
//! so inputs are sanitized rather than rejected. Computed layouts are
//! checked before anything is drawn: a gauge that cannot be laid out
//! renders nothing instead of rendering clipped.

use super::Layout;
use crate::errors::GeometryError;
use crate::types::{Size, check_finite, check_non_negative, check_positive};

/// Stand-in for a container dimension that is missing, zero, negative or
/// not finite.
pub const MIN_CONTAINER_DIM: f64 = 1.0;

/// Replace unusable container dimensions with [`MIN_CONTAINER_DIM`].
pub fn sanitize_container(width: f64, height: f64) -> Size {
    let fix = |v: f64| {
        if v.is_finite() && v >= MIN_CONTAINER_DIM {
            v
        } else {
            MIN_CONTAINER_DIM
        }
    };
    Size::new(fix(width), fix(height))
}

/// Check every dimension of `layout` and report the first bad one.
pub fn validate_layout(layout: &Layout) -> Result<(), GeometryError> {
    let positive = [
        ("outer_radius", layout.outer_radius),
        ("view_box.width", layout.view_box.width),
        ("view_box.height", layout.view_box.height),
    ];
    for (field, value) in positive {
        check_positive(value).map_err(|reason| GeometryError::InvalidGeometry {
            field,
            value,
            reason,
        })?;
    }

    check_non_negative(layout.inner_radius).map_err(|reason| GeometryError::InvalidGeometry {
        field: "inner_radius",
        value: layout.inner_radius,
        reason,
    })?;

    let finite = [
        ("view_box.x", layout.view_box.x),
        ("view_box.y", layout.view_box.y),
        ("gauge_center.x", layout.gauge_center.x),
        ("gauge_center.y", layout.gauge_center.y),
    ];
    for (field, value) in finite {
        check_finite(value).map_err(|reason| GeometryError::InvalidGeometry {
            field,
            value,
            reason,
        })?;
    }

    if layout.inner_radius > layout.outer_radius {
        return Err(GeometryError::InvertedRadii {
            inner: layout.inner_radius,
            outer: layout.outer_radius,
        });
    }

    Ok(())
}

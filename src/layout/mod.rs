//! Gauge layout engine
//!
//! This module is organized into submodules:
//! - `coordinate`: the geometry solver (radius, viewBox, center)
//! - `padding`: per-type padding profiles and the dynamic padding model
//! - `refine`: second-pass refit from measured content bounds
//! - `stability`: tolerance check that breaks resize feedback loops
//! - `validate`: geometry sanity checks run before anything is drawn

pub mod coordinate;
pub mod padding;
pub mod refine;
pub mod stability;
pub mod validate;

pub use coordinate::{
    calculate_gauge_center, calculate_gauge_layout, calculate_optimal_radius, calculate_view_box,
};
pub use padding::{
    Padding, PaddingConfig, PaddingProfile, calculate_dynamic_padding, calculate_padded_layout,
    tick_scale_factor,
};
pub use refine::calculate_layout_from_measured_bounds;
pub use stability::{DEFAULT_STABILITY_TOLERANCE, is_layout_stable};
pub use validate::{sanitize_container, validate_layout};

use crate::types::{Point, ViewBox};

/// Margin (fraction of each container dimension, per side) used when the
/// caller has no preference.
pub const DEFAULT_MARGIN: f64 = 0.0;

/// Largest accepted margin; beyond this nothing would be left to draw in.
pub const MAX_MARGIN: f64 = 0.45;

/// The computed geometry for one gauge at one container size.
///
/// Replaced wholesale on every recompute, never patched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub view_box: ViewBox,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Translation origin for arcs, ticks, pointer and labels
    pub gauge_center: Point,
    /// Translation applied to the arc group
    pub doughnut_transform: Point,
}

impl Layout {
    /// Build a layout around a known radius using `profile` for padding.
    pub fn from_radius(outer_radius: f64, profile: &PaddingProfile, arc_width: f64) -> Self {
        let view_box = calculate_view_box(outer_radius, *profile);
        let gauge_center = calculate_gauge_center(&view_box, outer_radius, *profile);
        Layout {
            view_box,
            outer_radius,
            inner_radius: inner_radius(outer_radius, arc_width),
            gauge_center,
            doughnut_transform: gauge_center,
        }
    }

    /// Arc band thickness as a fraction of the outer radius
    pub fn arc_width(&self) -> f64 {
        if self.outer_radius > 0.0 {
            1.0 - self.inner_radius / self.outer_radius
        } else {
            0.0
        }
    }
}

/// `outer * (1 - arc_width)` with `arc_width` forced into `[0, 1]`.
pub fn inner_radius(outer_radius: f64, arc_width: f64) -> f64 {
    let w = if arc_width.is_nan() { 0.0 } else { arc_width.clamp(0.0, 1.0) };
    outer_radius * (1.0 - w)
}

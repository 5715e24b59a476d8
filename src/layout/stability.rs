//! Layout stability check.
//!
//! A resize observer that reacts to its own reflow can re-measure a layout
//! that differs only by sub-pixel noise. Treating such a layout as "changed"
//! starts an endless re-render loop, so commits are gated on this check.

use super::Layout;

/// Relative change below which a new layout counts as the same one.
pub const DEFAULT_STABILITY_TOLERANCE: f64 = 0.01;

/// `|current - previous| / previous`, or the absolute delta when the
/// previous value is zero.
fn relative_change(previous: f64, current: f64) -> f64 {
    let delta = (current - previous).abs();
    if previous == 0.0 {
        delta
    } else {
        delta / previous.abs()
    }
}

/// True when `current` differs from `previous` by less than `tolerance`
/// (relative) in each of: outer radius, viewBox width, viewBox height,
/// center x and center y.
///
/// A missing `previous` is always stable. All five quantities are checked
/// because a drifting center with a steady radius (or the reverse) is the
/// usual shape of a resize feedback loop.
pub fn is_layout_stable(previous: Option<&Layout>, current: &Layout, tolerance: f64) -> bool {
    let Some(previous) = previous else {
        return true;
    };

    let pairs = [
        (previous.outer_radius, current.outer_radius),
        (previous.view_box.width, current.view_box.width),
        (previous.view_box.height, current.view_box.height),
        (previous.gauge_center.x, current.gauge_center.x),
        (previous.gauge_center.y, current.gauge_center.y),
    ];

    pairs
        .iter()
        .all(|&(prev, cur)| relative_change(prev, cur) < tolerance)
}

//! Geometry solver: the largest gauge that fits a container.
//!
//! Every function here is pure. Padding enters through a
//! [`PaddingProfile`]; passing a [`GaugeType`](crate::config::GaugeType)
//! uses that type's static profile.

use super::padding::PaddingProfile;
use super::validate::sanitize_container;
use super::{Layout, MAX_MARGIN};
use crate::types::{Point, ViewBox};

/// Radius below which the solver stops shrinking. Only reached when the
/// container itself is degenerate.
pub const MIN_RADIUS: f64 = 1e-3;

/// Largest radius whose padded gauge fits `container_width x container_height`
/// after shrinking each dimension by `margin_percent` on both sides.
///
/// Width and height each give a candidate radius; the smaller one wins, so
/// wide containers end up height-limited and tall ones width-limited.
/// Degenerate containers never produce NaN or a non-positive radius.
pub fn calculate_optimal_radius(
    container_width: f64,
    container_height: f64,
    profile: impl Into<PaddingProfile>,
    margin_percent: f64,
) -> f64 {
    let profile = profile.into();
    let container = sanitize_container(container_width, container_height);
    let margin = if margin_percent.is_finite() {
        margin_percent.clamp(0.0, MAX_MARGIN)
    } else {
        0.0
    };

    let available_width = container.width * (1.0 - 2.0 * margin);
    let available_height = container.height * (1.0 - 2.0 * margin);

    let radius_from_width = available_width / profile.width_factor();
    let radius_from_height = available_height / profile.height_factor();
    let radius = radius_from_width.min(radius_from_height);

    crate::log::debug!(
        radius_from_width,
        radius_from_height,
        width_limited = radius_from_width < radius_from_height,
        "optimal radius"
    );

    if radius.is_finite() && radius > MIN_RADIUS {
        radius
    } else {
        MIN_RADIUS
    }
}

/// The viewBox for a gauge of `outer_radius`: `2r` plus side padding wide,
/// and tall enough for top padding, the arc's vertical footprint and bottom
/// padding.
pub fn calculate_view_box(outer_radius: f64, profile: impl Into<PaddingProfile>) -> ViewBox {
    let profile = profile.into();
    ViewBox::new(
        0.0,
        0.0,
        outer_radius * profile.width_factor(),
        outer_radius * profile.height_factor(),
    )
}

/// Gauge center inside `view_box`: horizontally centered, one radius below
/// the top padding.
pub fn calculate_gauge_center(
    view_box: &ViewBox,
    outer_radius: f64,
    profile: impl Into<PaddingProfile>,
) -> Point {
    let profile = profile.into();
    Point::new(
        view_box.width / 2.0,
        profile.top * outer_radius + outer_radius,
    )
}

/// Full layout for a container: radius, viewBox, center and inner radius.
///
/// `arc_width = 0` gives `inner_radius == outer_radius`; `arc_width = 1`
/// fills the arc to the center.
pub fn calculate_gauge_layout(
    container_width: f64,
    container_height: f64,
    profile: impl Into<PaddingProfile>,
    arc_width: f64,
    margin_percent: f64,
) -> Layout {
    let profile = profile.into();
    let radius =
        calculate_optimal_radius(container_width, container_height, profile, margin_percent);
    Layout::from_radius(radius, &profile, arc_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaugeType;
    use crate::layout::DEFAULT_MARGIN;

    const EPS: f64 = 0.01;

    #[test]
    fn wide_container_is_height_limited() {
        let wide = calculate_optimal_radius(800.0, 100.0, GaugeType::Semicircle, 0.0);
        let profile = PaddingProfile::from(GaugeType::Semicircle);
        assert!((wide - 100.0 / profile.height_factor()).abs() < 1e-9);
    }

    #[test]
    fn tall_container_is_width_limited() {
        let tall = calculate_optimal_radius(100.0, 800.0, GaugeType::Radial, 0.0);
        let profile = PaddingProfile::from(GaugeType::Radial);
        assert!((tall - 100.0 / profile.width_factor()).abs() < 1e-9);
    }

    #[test]
    fn margin_shrinks_radius() {
        let none = calculate_optimal_radius(400.0, 300.0, GaugeType::Grafana, 0.0);
        let some = calculate_optimal_radius(400.0, 300.0, GaugeType::Grafana, 0.1);
        assert!((some / none - 0.8).abs() < 1e-9);
    }

    #[test]
    fn degenerate_container_gives_positive_finite_radius() {
        for (w, h) in [(0.0, 0.0), (-50.0, 20.0), (f64::NAN, 100.0), (100.0, f64::INFINITY)] {
            let r = calculate_optimal_radius(w, h, GaugeType::Semicircle, DEFAULT_MARGIN);
            assert!(r.is_finite() && r > 0.0, "radius {r} for {w}x{h}");
        }
    }

    #[test]
    fn absurd_margin_is_clamped() {
        let r = calculate_optimal_radius(400.0, 300.0, GaugeType::Radial, 3.0);
        assert!(r.is_finite() && r > 0.0);
        let nan = calculate_optimal_radius(400.0, 300.0, GaugeType::Radial, f64::NAN);
        assert_eq!(nan, calculate_optimal_radius(400.0, 300.0, GaugeType::Radial, 0.0));
    }

    #[test]
    fn view_box_inverts_radius_formula() {
        for ty in GaugeType::ALL {
            let r = calculate_optimal_radius(500.0, 500.0, ty, 0.0);
            let vb = calculate_view_box(r, ty);
            let fits_w = (vb.width - 500.0).abs() < EPS;
            let fits_h = (vb.height - 500.0).abs() < EPS;
            assert!(fits_w || fits_h, "{ty:?}: one dimension must be binding");
            assert!(vb.width <= 500.0 + EPS && vb.height <= 500.0 + EPS);
        }
    }

    #[test]
    fn center_is_horizontally_centered_and_below_top_padding() {
        let profile = PaddingProfile::from(GaugeType::Radial);
        let vb = calculate_view_box(80.0, profile);
        let c = calculate_gauge_center(&vb, 80.0, profile);
        assert_eq!(c.x, vb.width / 2.0);
        assert!((c.y - (profile.top * 80.0 + 80.0)).abs() < 1e-12);
    }

    #[test]
    fn circle_stays_inside_viewbox_except_hidden_bottom() {
        for ty in GaugeType::ALL {
            let layout = calculate_gauge_layout(640.0, 220.0, ty, 0.2, 0.0);
            let c = layout.gauge_center;
            let r = layout.outer_radius;
            assert!(c.x - r >= -EPS);
            assert!(c.y - r >= -EPS);
            assert!(c.x + r <= layout.view_box.width + EPS);
            let footprint_bottom = c.y + r * ty.arc_bottom_extent();
            assert!(footprint_bottom <= layout.view_box.height + EPS);
        }
    }

    #[test]
    fn extreme_aspect_ratios_do_not_panic() {
        for ty in GaugeType::ALL {
            for (w, h) in [(800.0, 100.0), (100.0, 800.0), (10000.0, 1.0), (1.0, 10000.0)] {
                let layout = calculate_gauge_layout(w, h, ty, 0.2, DEFAULT_MARGIN);
                assert!(layout.view_box.width <= w + EPS);
                assert!(layout.view_box.height <= h + EPS);
            }
        }
    }
}

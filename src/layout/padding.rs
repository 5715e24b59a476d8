//! Padding model.
//!
//! A [`PaddingProfile`] expresses padding as fractions of the outer radius,
//! which is what the solver works with. The dynamic model computes padding
//! in absolute units from what is actually drawn (ticks, tick labels, value
//! label, pointer overshoot) and converts it back into a profile.

use super::Layout;
use super::coordinate::calculate_optimal_radius;
use crate::config::{GaugeProps, GaugeType, TickType};

/// Padding around the gauge circle, as fractions of the outer radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddingProfile {
    pub top: f64,
    pub bottom: f64,
    /// Applied on both the left and the right
    pub side: f64,
    /// How far the arc reaches below its center line (fraction of radius)
    pub arc_bottom_extent: f64,
}

impl PaddingProfile {
    /// Horizontal size of the padded gauge in radii
    pub fn width_factor(&self) -> f64 {
        2.0 + 2.0 * self.side
    }

    /// Vertical size of the padded gauge in radii
    pub fn height_factor(&self) -> f64 {
        self.top + 1.0 + self.arc_bottom_extent + self.bottom
    }

    /// Scale the padding (not the arc footprint) by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        PaddingProfile {
            top: self.top * factor,
            bottom: self.bottom * factor,
            side: self.side * factor,
            arc_bottom_extent: self.arc_bottom_extent,
        }
    }
}

impl From<GaugeType> for PaddingProfile {
    fn from(gauge_type: GaugeType) -> Self {
        let arc_bottom_extent = gauge_type.arc_bottom_extent();
        match gauge_type {
            // Only the top half is drawn; bottom padding leaves room for the
            // value label under the center line.
            GaugeType::Semicircle => PaddingProfile {
                top: 0.10,
                bottom: 0.20,
                side: 0.10,
                arc_bottom_extent,
            },
            GaugeType::Radial => PaddingProfile {
                top: 0.10,
                bottom: 0.05,
                side: 0.10,
                arc_bottom_extent,
            },
            GaugeType::Grafana => PaddingProfile {
                top: 0.08,
                bottom: 0.05,
                side: 0.08,
                arc_bottom_extent,
            },
        }
    }
}

/// Absolute padding in viewBox units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub side: f64,
}

impl Padding {
    /// Express this padding relative to `outer_radius`.
    pub fn to_profile(&self, outer_radius: f64, gauge_type: GaugeType) -> PaddingProfile {
        let r = outer_radius.max(super::coordinate::MIN_RADIUS);
        PaddingProfile {
            top: self.top / r,
            bottom: self.bottom / r,
            side: self.side / r,
            arc_bottom_extent: gauge_type.arc_bottom_extent(),
        }
    }
}

/// What the current props draw outside the arc. Derived fresh on every
/// layout pass, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaddingConfig {
    pub has_outer_ticks: bool,
    pub has_inner_ticks: bool,
    pub has_tick_labels: bool,
    pub tick_label_font_size: f64,
    /// Widest tick label, in characters
    pub tick_label_chars: usize,
    /// Tick line length plus its gap from the arc
    pub tick_reach: f64,
    pub has_value_label: bool,
    pub value_label_font_size: f64,
    /// Fraction of the radius; above 1 the pointer overshoots the arc
    pub pointer_length: f64,
}

impl PaddingConfig {
    pub fn from_props(props: &GaugeProps) -> Self {
        let tick_labels = &props.labels.tick_labels;
        let line = &tick_labels.default_tick_line;
        let value_cfg = &tick_labels.default_tick_value;

        let tick_values = crate::render::ticks::tick_values(props);
        let has_ticks = !tick_values.is_empty() && !line.hide;
        let has_tick_labels = !tick_values.is_empty() && !value_cfg.hide;

        let tick_label_chars = tick_values
            .iter()
            .map(|v| crate::config::format_value(*v, value_cfg.max_decimal_digits).chars().count())
            .max()
            .unwrap_or(0);

        let value_label = &props.labels.value_label;

        PaddingConfig {
            has_outer_ticks: has_ticks && tick_labels.tick_type == TickType::Outer,
            has_inner_ticks: has_ticks && tick_labels.tick_type == TickType::Inner,
            has_tick_labels,
            tick_label_font_size: value_cfg.font_size,
            tick_label_chars,
            tick_reach: line.length + line.distance_from_arc,
            has_value_label: !value_label.hide,
            value_label_font_size: value_label.font_size,
            pointer_length: props.max_pointer_length(),
        }
    }

    fn has_outer_labels(&self) -> bool {
        self.has_tick_labels && !self.has_inner_ticks
    }
}

/// `clamp(outer_radius / 100, 0.5, 1.5)`: fixed-size decorations are scaled
/// by this so small gauges do not reserve huge margins and large ones do not
/// under-reserve.
pub fn tick_scale_factor(outer_radius: f64) -> f64 {
    if !outer_radius.is_finite() {
        return 1.0;
    }
    (outer_radius / 100.0).clamp(0.5, 1.5)
}

/// Average glyph width relative to the font size
pub(crate) const GLYPH_WIDTH: f64 = 0.6;
/// Line height relative to the font size
pub(crate) const LINE_HEIGHT: f64 = 1.2;
/// Gap between tick line and its label, before scaling
pub(crate) const LABEL_GAP: f64 = 2.0;

/// Minimum padding fractions, applied whatever the dynamic model says.
mod floors {
    pub const TOP: f64 = 0.05;
    pub const BOTTOM: f64 = 0.05;
    pub const SIDE: f64 = 0.05;
    /// Semicircle tick labels at 0 and 180 degrees stick straight out sideways
    pub const SEMICIRCLE_LABELED_SIDE: f64 = 0.37;
    pub const LABELED_SIDE: f64 = 0.20;
    pub const LABELED_TOP: f64 = 0.15;
}

/// Absolute padding for a gauge of `outer_radius` with the decorations
/// described by `config`.
///
/// Side padding accounts for label width (labels at the arc ends extend
/// horizontally); top padding accounts for label height.
pub fn calculate_dynamic_padding(
    config: &PaddingConfig,
    outer_radius: f64,
    gauge_type: GaugeType,
) -> Padding {
    let r = outer_radius.max(0.0);
    let base = PaddingProfile::from(gauge_type);
    let scale = tick_scale_factor(r);

    let mut top = base.top * r;
    let mut bottom = base.bottom * r;
    let mut side = base.side * r;

    if config.has_outer_ticks {
        let reach = config.tick_reach * scale;
        top += reach;
        side += reach;
    }

    if config.has_outer_labels() {
        let font = config.tick_label_font_size * scale;
        let gap = LABEL_GAP * scale;
        top += font * LINE_HEIGHT + gap;
        side += config.tick_label_chars as f64 * font * GLYPH_WIDTH + gap;
        if gauge_type != GaugeType::Semicircle {
            // Labels at the arc ends hang below the arc footprint
            bottom += font * LINE_HEIGHT;
        }
    }

    let overshoot = (config.pointer_length - 1.0).max(0.0) * r;
    top += overshoot;
    side += overshoot;

    if config.has_value_label {
        let font = config.value_label_font_size * scale;
        bottom += match gauge_type {
            GaugeType::Semicircle => font * LINE_HEIGHT,
            _ => font * 0.5,
        };
    }

    let (min_top, min_side) = if config.has_outer_labels() {
        let side = if gauge_type == GaugeType::Semicircle {
            floors::SEMICIRCLE_LABELED_SIDE
        } else {
            floors::LABELED_SIDE
        };
        (floors::LABELED_TOP, side)
    } else {
        (floors::TOP, floors::SIDE)
    };

    Padding {
        top: top.max(min_top * r),
        bottom: bottom.max(floors::BOTTOM * r),
        side: side.max(min_side * r),
    }
}

/// Fixed-point iterations of radius -> padding -> radius. Containment holds
/// after any number of them because the final radius is always solved
/// against the final profile.
const PADDING_ITERATIONS: usize = 3;

/// Padding profile matching `config` for the largest gauge fitting the
/// container.
pub fn padded_profile(
    container_width: f64,
    container_height: f64,
    gauge_type: GaugeType,
    margin_percent: f64,
    config: &PaddingConfig,
) -> PaddingProfile {
    let mut profile = PaddingProfile::from(gauge_type);
    let mut radius =
        calculate_optimal_radius(container_width, container_height, profile, margin_percent);
    for _ in 0..PADDING_ITERATIONS {
        let padding = calculate_dynamic_padding(config, radius, gauge_type);
        profile = padding.to_profile(radius, gauge_type);
        radius =
            calculate_optimal_radius(container_width, container_height, profile, margin_percent);
    }
    profile
}

/// Layout using the dynamic padding model instead of the static profile.
pub fn calculate_padded_layout(
    container_width: f64,
    container_height: f64,
    gauge_type: GaugeType,
    arc_width: f64,
    margin_percent: f64,
    config: &PaddingConfig,
) -> Layout {
    let profile = padded_profile(
        container_width,
        container_height,
        gauge_type,
        margin_percent,
        config,
    );
    let radius =
        calculate_optimal_radius(container_width, container_height, profile, margin_percent);
    Layout::from_radius(radius, &profile, arc_width)
}

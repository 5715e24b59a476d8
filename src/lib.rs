//! Responsive SVG gauge charts.
//!
//! A gauge is sized to its container by a two-pass layout: a generously
//! padded first pass is drawn hidden, measured, and refit so the arcs,
//! ticks, labels and pointers fill the container without being clipped.
//! Prop updates are classified into rebuilds, in-place patches or no-ops,
//! and pointer transitions run on one shared animation loop.

pub mod animation;
pub mod config;
pub mod errors;
pub mod layout;
pub mod log;
pub mod render;
pub mod types;
pub mod update;

pub use animation::{AnimationCoordinator, FrameInfo, FrameQueue, FrameScheduler, TickReport};
pub use config::{
    ArcConfig, GaugeProps, GaugeType, LabelsConfig, PointerConfig, PointerSpec, PointerType, SubArc,
    Tick, TickType, ValueLabel,
};
pub use errors::{AnimationError, GaugeError, GeometryError};
pub use layout::{
    Layout, calculate_gauge_layout, calculate_layout_from_measured_bounds, calculate_optimal_radius,
    is_layout_stable, validate_layout,
};
pub use render::{Gauge, LayoutOutcome, LayoutTicket, Measure, SceneMeasurer};
pub use types::{Bounds, Point, Size, ViewBox};
pub use update::{UpdateKind, UpdatePlan, decide_update};

/// Render `props` into a `width x height` container as a standalone SVG
/// document.
///
/// Pointers are drawn at their target values; use a [`Gauge`] with an
/// [`AnimationCoordinator`] for animated transitions.
pub fn render_gauge(props: GaugeProps, width: f64, height: f64) -> Result<String, GaugeError> {
    let mut gauge = Gauge::new("gauge");
    gauge.set_props(props);
    gauge.resize(width, height)?;
    gauge.render_svg().ok_or(GaugeError::NotInitialized)
}

//! Error types with diagnostics using miette
//!
//! Geometry errors say which field was wrong, what its value was and why it
//! was rejected.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors found while validating a computed layout or measured bounds
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid geometry: {field} = {value} ({reason})")]
    #[diagnostic(
        code(svgauge::layout::invalid_geometry),
        help("radii and viewBox dimensions must be finite and positive; check the container size")
    )]
    InvalidGeometry {
        field: &'static str,
        value: f64,
        reason: NumericError,
    },

    #[error("inner radius {inner} exceeds outer radius {outer}")]
    #[diagnostic(
        code(svgauge::layout::inverted_radii),
        help("arc width must lie in [0, 1]")
    )]
    InvertedRadii { inner: f64, outer: f64 },

    #[error("invalid measured bounds: {field} = {value}")]
    #[diagnostic(
        code(svgauge::layout::invalid_bounds),
        help("measured bounds must be finite with a positive width and height")
    )]
    InvalidBounds { field: &'static str, value: f64 },

    #[error("content {width} x {height} does not fit the {view_width} x {view_height} viewBox")]
    #[diagnostic(
        code(svgauge::layout::content_overflow),
        help("the container is too small for the gauge's labels; enlarge it or hide tick labels")
    )]
    ContentOverflow {
        width: f64,
        height: f64,
        view_width: f64,
        view_height: f64,
    },
}

// ============================================================================
// Animation Errors
// ============================================================================

/// A per-entry animation failure. Logged by the coordinator and never
/// propagated out of a tick.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("animation `{id}` failed: {message}")]
#[diagnostic(code(svgauge::animation::callback_failed))]
pub struct AnimationError {
    pub id: String,
    pub message: String,
}

impl AnimationError {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Gauge Errors
// ============================================================================

/// Errors surfaced by a gauge instance
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GaugeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    #[error("layout ticket {ticket} is stale (current generation is {current})")]
    #[diagnostic(code(svgauge::render::stale_ticket))]
    StaleLayoutTicket { ticket: u64, current: u64 },

    #[error("gauge has no props yet")]
    #[diagnostic(
        code(svgauge::render::not_initialized),
        help("call `set_props` before requesting a layout")
    )]
    NotInitialized,
}

//! Default settings for the two-pass renderer

/// Padding multiplier for the hidden first pass, so everything drawn is
/// visible to the measurement
pub const PROVISIONAL_PADDING_SCALE: f64 = 1.5;
/// Upper bound on measure-and-refit rounds per layout request
pub const REFINE_PASSES: usize = 16;
/// Slack allowed when checking measured content against the viewBox
pub const CONTAINMENT_EPSILON: f64 = 1e-6;
/// Priority of the primary pointer's animation; each further pointer
/// ranks one lower
pub const POINTER_PRIORITY: i32 = 10;

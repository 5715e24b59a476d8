//! Numeric primitives for gauge geometry.
//!
//! All coordinates are in viewBox units. The gauge's own drawing space is
//! center-anchored: `(0, 0)` is the gauge center and y grows downwards, as
//! in SVG.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Reject NaN and infinities.
#[inline]
pub fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Reject NaN, infinities, zero and negatives.
#[inline]
pub fn check_positive(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Reject NaN, infinities and negatives (zero allowed).
#[inline]
pub fn check_non_negative(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<glam::DVec2> for Point {
    fn from(v: glam::DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for glam::DVec2 {
    fn from(p: Point) -> Self {
        glam::dvec2(p.x, p.y)
    }
}

/// Container or element size
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    /// The smaller of the two dimensions
    pub fn min_dim(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
///
/// Used both for measured content bounds (center-relative, so `x`/`y` are
/// usually negative) and as the accumulator for scene measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Bounds { x, y, width, height }
    }

    /// Bounds from two opposite corners
    pub fn from_corners(min: Point, max: Point) -> Self {
        Bounds {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Same size, moved by `offset`
    pub fn translated(&self, offset: Point) -> Self {
        Bounds::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Check that every component is finite and the extent is positive
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Accumulates points into a bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsBuilder {
    min: Point,
    max: Point,
}

impl Default for BoundsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundsBuilder {
    /// Create an empty builder (will expand on first point)
    pub fn new() -> Self {
        BoundsBuilder {
            min: Point::new(f64::MAX, f64::MAX),
            max: Point::new(f64::MIN, f64::MIN),
        }
    }

    /// Check if nothing was added yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Expand to include a rectangle defined by its center and size
    pub fn expand_rect(&mut self, center: Point, size: Size) {
        let hw = size.width / 2.0;
        let hh = size.height / 2.0;
        self.expand_point(Point::new(center.x - hw, center.y - hh));
        self.expand_point(Point::new(center.x + hw, center.y + hh));
    }

    /// Finish; `None` if nothing was added
    pub fn build(&self) -> Option<Bounds> {
        if self.is_empty() {
            None
        } else {
            Some(Bounds::from_corners(self.min, self.max))
        }
    }
}

/// The coordinate-system declaration of the rendering surface.
///
/// `Display` produces `"x y width height"`, ready for an SVG `viewBox`
/// attribute.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        ViewBox { x, y, width, height }
    }

    /// Does the rectangle lie inside this viewBox, within `eps`?
    pub fn contains(&self, b: &Bounds, eps: f64) -> bool {
        b.x >= self.x - eps
            && b.y >= self.y - eps
            && b.x + b.width <= self.x + self.width + eps
            && b.y + b.height <= self.y + self.height + eps
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

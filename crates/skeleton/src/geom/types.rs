//! Point/vector primitives and the tolerance bundle used throughout the kernel.
//!
//! References
//! - Grounded on `original_source/monos/inc/cgTypes.h` (`Point`, `Vector`, `ORIGIN`,
//!   `INFPOINT`) and on the teacher's `geom2::types::GeomCfg` epsilon-bundle pattern.

use nalgebra::Vector2;

/// A point in the plane.
///
/// The kernel has no exact rational/algebraic backend (spec.md §9 sanctions
/// `f64` + explicit tolerances as a fallback), so `Point` is a thin
/// `f64`-coordinate wrapper with an `INFINITY` sentinel that never compares
/// equal to a finite point.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    /// Sentinel marking "no such point"; must never compare equal to a real point.
    pub const INFINITY: Point = Point::new(f64::INFINITY, f64::INFINITY);

    #[inline]
    pub fn is_infinite(&self) -> bool {
        !self.x.is_finite() || !self.y.is_finite()
    }

    #[inline]
    pub fn to_vector(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn from_vector(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }

    #[inline]
    pub fn eq_within(&self, other: &Point, eps: f64) -> bool {
        if self.is_infinite() || other.is_infinite() {
            return false;
        }
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl std::ops::Sub for Point {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add<Vec2> for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Plain 2D vector; `nalgebra::Vector2<f64>` used directly (same alias the
/// teacher exposes as `Vec2` in `lib.rs`).
pub type Vec2 = Vector2<f64>;

/// Centralized numeric tolerances, following `geom2::types::GeomCfg`.
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Slack for determinant/cross-product based predicates (parallel, collinear).
    pub eps_det: f64,
    /// Slack for point-coincidence and membership comparisons.
    pub eps_point: f64,
    /// Slack used when comparing event times.
    pub eps_time: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-9,
            eps_point: 1e-9,
            eps_time: 1e-9,
        }
    }
}

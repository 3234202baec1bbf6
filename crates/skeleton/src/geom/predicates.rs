//! Orientation and parallelism predicates.
//!
//! `signed_area`/`right_turn` are the `parallelogram_area` determinant from
//! the teacher's `geometry.rs`, generalized from `Vec2 x Vec2` to three
//! `Point`s (matching `CGAL::right_turn(a, b, c)` as used in
//! `original_source/monos/src/Data.cpp`'s `ensureMonotonicity`).

use super::types::{GeomCfg, Point, Vec2};

/// Signed area of the parallelogram spanned by `(b - a)` and `(c - a)`.
///
/// Positive when `a, b, c` turn left (CCW), negative when they turn right.
#[inline]
pub fn signed_area(a: Point, b: Point, c: Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// `CGAL::right_turn(a, b, c)`: true iff `a -> b -> c` turns clockwise.
#[inline]
pub fn right_turn(a: Point, b: Point, c: Point) -> bool {
    signed_area(a, b, c) < 0.0
}

/// True iff `a -> b -> c` turns counter-clockwise.
#[inline]
pub fn left_turn(a: Point, b: Point, c: Point) -> bool {
    signed_area(a, b, c) > 0.0
}

/// True iff two directions are parallel (same or opposite sense) within `cfg.eps_det`.
#[inline]
pub fn parallel(a: Vec2, b: Vec2, cfg: &GeomCfg) -> bool {
    (a.x * b.y - a.y * b.x).abs() <= cfg.eps_det * (a.norm() * b.norm()).max(1.0)
}

/// True iff `a` and `b` point in (numerically) the same direction, i.e. they
/// are parallel and their dot product is non-negative.
#[inline]
pub fn same_direction(a: Vec2, b: Vec2, cfg: &GeomCfg) -> bool {
    parallel(a, b, cfg) && a.dot(&b) >= 0.0
}

/// Angle of a direction vector in `(-pi, pi]`.
#[inline]
pub fn angle_of(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

/// Wrap an angle into `(-pi, pi]`.
#[inline]
pub fn wrap_angle(a: f64) -> f64 {
    let mut x = a;
    while x <= -std::f64::consts::PI {
        x += 2.0 * std::f64::consts::PI;
    }
    while x > std::f64::consts::PI {
        x -= 2.0 * std::f64::consts::PI;
    }
    x
}

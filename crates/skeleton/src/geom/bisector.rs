//! Weighted angle bisectors.
//!
//! Grounded in `original_source/monos/inc/cgTypes.h`'s `Bisector` class: a
//! `Ray`/`Line` variant plus a `perpendicular` flag, `direction()`,
//! `to_vector()`, `changeDirection`, `newSource`.
//!
//! A weighted bisector between two edges meeting at `apex` with inward unit
//! normals `n_a`, `n_b` and weights `w_a`, `w_b` is the locus of points
//! `apex + t*d` whose perpendicular distance to each edge's original
//! supporting line grows at exactly `t*w_a` and `t*w_b` respectively (since
//! `apex` lies on both lines, that distance is `n_i . (t*d)`). Solving
//! `n_a.d = w_a`, `n_b.d = w_b` gives a unique direction unless the normals
//! are parallel.

use super::predicates::parallel;
use super::types::{GeomCfg, Point, Vec2};
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BisectorKind {
    Ray,
    Line,
}

/// A bisector: either a one-sided ray or a two-sided line through `apex`,
/// plus a `perpendicular` flag recording whether it was built from a
/// degenerate (parallel-normal) configuration rather than a regular solve.
#[derive(Clone, Copy, Debug)]
pub struct Bisector {
    kind: BisectorKind,
    apex: Point,
    dir: Vec2,
    perpendicular: bool,
}

impl Bisector {
    #[inline]
    pub fn ray(apex: Point, dir: Vec2) -> Self {
        Self {
            kind: BisectorKind::Ray,
            apex,
            dir,
            perpendicular: false,
        }
    }

    #[inline]
    pub fn line(apex: Point, dir: Vec2) -> Self {
        Self {
            kind: BisectorKind::Line,
            apex,
            dir,
            perpendicular: false,
        }
    }

    #[inline]
    pub fn is_ray(&self) -> bool {
        self.kind == BisectorKind::Ray
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        self.kind == BisectorKind::Line
    }

    #[inline]
    pub fn point(&self) -> Point {
        self.apex
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn to_vector(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn set_perpendicular(&mut self, value: bool) {
        self.perpendicular = value;
    }

    #[inline]
    pub fn is_perpendicular(&self) -> bool {
        self.perpendicular
    }

    /// Flip the direction in place, keeping the same apex and kind.
    #[inline]
    pub fn change_direction(&mut self) {
        self.dir = -self.dir;
    }

    /// Relocate the apex without touching the direction, matching
    /// `Bisector::newSource` (used once an arc's true first node is known).
    #[inline]
    pub fn with_source(&self, new_apex: Point) -> Self {
        Self {
            apex: new_apex,
            ..*self
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        self.apex + self.dir * t
    }
}

/// Build the weighted bisector at a vertex shared by two edges, given their
/// inward unit normals and non-negative weights.
///
/// `n_a`/`n_b` must already be unit-length and pointing into the polygon
/// interior; `dir_a` is the direction of the incoming edge (used only to
/// resolve the degenerate parallel cases).
pub fn weighted_bisector(
    apex: Point,
    n_a: Vec2,
    w_a: f64,
    n_b: Vec2,
    w_b: f64,
    cfg: &GeomCfg,
) -> Bisector {
    let det = n_a.x * n_b.y - n_a.y * n_b.x;
    if det.abs() > cfg.eps_det {
        let dx = (w_a * n_b.y - w_b * n_a.y) / det;
        let dy = (n_a.x * w_b - n_b.x * w_a) / det;
        return Bisector::ray(apex, Vec2::new(dx, dy));
    }

    if parallel(n_a, n_b, cfg) && n_a.dot(&n_b) < 0.0 {
        // Anti-parallel normals: the two edges run along the same supporting
        // line in opposite senses (a zero-angle reflex cusp). The bisector
        // degenerates to the perpendicular through the apex, oriented into
        // edge `a`'s interior half-plane.
        let mut b = Bisector::ray(apex, n_a.normalize());
        b.set_perpendicular(true);
        return b;
    }

    // Same-sense parallel normals: a flat (180 degree) vertex. The vertex
    // trajectory is the ordinary perpendicular offset, represented as a line
    // because there is no forward/backward ambiguity to resolve. Unequal
    // weights here have no exact solution (the two offset lines never meet);
    // we still return the perpendicular through the apex as the best
    // available direction and flag it.
    let mut b = Bisector::line(apex, n_a.normalize());
    if (w_a - w_b).abs() > cfg.eps_point {
        b.set_perpendicular(true);
    }
    b
}

/// Time and point at which two vertex trajectories (each a point, a birth
/// time, and a bisector direction) collapse onto the shared offset line of
/// `edge_dir`, assuming both already satisfy that edge's offset invariant.
///
/// Shared by the wavefront propagator (adjacent vertices within one chain)
/// and the skeleton merger (the seam vertices spliced in at the chains'
/// shared anchors), since both are the same algebraic problem: solve for
/// `t` such that `pl + dl*(t-tl)` and `pr + dr*(t-tr)` project to the same
/// point along `edge_dir`.
///
/// `Ok(None)` means the two trajectories never meet (parallel rates along
/// the edge, `denom` near zero) — a legitimate outcome. `Err` means a
/// solution exists but is numerically unusable: a non-finite `t`, or a `t`
/// that regresses behind both trajectories' own birth times, which can only
/// happen from bad upstream geometry.
pub fn bisector_collapse_time(
    pl: Point,
    tl: f64,
    dl: Vec2,
    pr: Point,
    tr: f64,
    dr: Vec2,
    edge_dir: Vec2,
    cfg: &GeomCfg,
) -> Result<Option<(f64, Point)>> {
    let c = (pr - pl) - dr * tr + dl * tl;
    let rate = dr - dl;
    let denom = rate.dot(&edge_dir);
    if denom.abs() <= cfg.eps_det {
        return Ok(None);
    }
    let t = -c.dot(&edge_dir) / denom;
    let floor = tl.max(tr);
    if !t.is_finite() {
        return Err(Error::NumericInconsistency(format!(
            "bisector collapse solve produced a non-finite time from denom {denom}"
        )));
    }
    if t < floor - cfg.eps_time {
        return Err(Error::NumericInconsistency(format!(
            "bisector collapse time {t} regresses before floor {floor}"
        )));
    }
    let t = t.max(floor);
    let point = pl + dl * (t - tl);
    Ok(Some((t, point)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convex_right_angle_equal_weights_bisects_45_degrees() {
        let cfg = GeomCfg::default();
        let apex = Point::new(0.0, 0.0);
        let n_a = Vec2::new(1.0, 0.0);
        let n_b = Vec2::new(0.0, 1.0);
        let b = weighted_bisector(apex, n_a, 1.0, n_b, 1.0, &cfg);
        assert!(b.is_ray());
        let d = b.direction().normalize();
        assert!((d.x - d.y).abs() < 1e-9);
        assert!(d.x > 0.0);
    }

    #[test]
    fn unequal_weights_skew_the_bisector() {
        let cfg = GeomCfg::default();
        let apex = Point::new(0.0, 0.0);
        let n_a = Vec2::new(1.0, 0.0);
        let n_b = Vec2::new(0.0, 1.0);
        let b = weighted_bisector(apex, n_a, 2.0, n_b, 1.0, &cfg);
        let d = b.direction();
        assert!((d.x - 2.0).abs() < 1e-9);
        assert!((d.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn flat_vertex_equal_weight_is_a_line() {
        let cfg = GeomCfg::default();
        let apex = Point::new(1.0, 0.0);
        let n = Vec2::new(0.0, 1.0);
        let b = weighted_bisector(apex, n, 1.0, n, 1.0, &cfg);
        assert!(b.is_line());
        assert!(!b.is_perpendicular());
    }

    #[test]
    fn anti_parallel_normals_produce_perpendicular_ray() {
        let cfg = GeomCfg::default();
        let apex = Point::new(0.0, 0.0);
        let n_a = Vec2::new(0.0, 1.0);
        let n_b = Vec2::new(0.0, -1.0);
        let b = weighted_bisector(apex, n_a, 1.0, n_b, 1.0, &cfg);
        assert!(b.is_ray());
        assert!(b.is_perpendicular());
        assert!((b.direction().normalize() - n_a).norm() < 1e-9);
    }

    #[test]
    fn change_direction_flips_in_place() {
        let mut b = Bisector::ray(Point::ORIGIN, Vec2::new(1.0, 0.0));
        b.change_direction();
        assert_eq!(b.direction(), Vec2::new(-1.0, 0.0));
    }
}

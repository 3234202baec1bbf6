//! Monotonicity analysis: finds a direction the polygon is monotone with
//! respect to, plus the bounding-box data the output writer needs.
//!
//! Grounded in `original_source/monos/src/Data.cpp`'s
//! `ensureMonotonicity`/`testMonotonicityLineOnPolygon`/
//! `getMonotonicityLineFromVector`/`assignBoundingBox`: reflex vertices
//! contribute candidate directions (the perpendicular to the internal angle
//! bisector of their two incident edges), and each candidate is verified by
//! walking the boundary from its projection-minimum and checking for at most
//! one rising-to-falling reversal.

use crate::error::{Error, Result};
use crate::geom::{predicates::signed_area, GeomCfg, Point, Vec2};
use crate::model::Polygon;

#[derive(Clone, Copy, Debug)]
pub struct BoundingData {
    pub x_min_idx: usize,
    pub x_max_idx: usize,
    pub y_min_idx: usize,
    pub y_max_idx: usize,
    pub mon_min_idx: usize,
    pub mon_max_idx: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub mon_min: Point,
    pub mon_max: Point,
}

#[derive(Clone, Copy, Debug)]
pub struct Monotonicity {
    /// Direction the polygon is monotone with respect to.
    pub direction: Vec2,
    pub bounds: BoundingData,
}

/// Find a monotonicity direction and the polygon's bounding data.
pub fn analyze(poly: &Polygon, cfg: &GeomCfg) -> Result<Monotonicity> {
    let direction = find_monotonicity_direction(poly, cfg)?;
    let bounds = compute_bounds(poly, direction);
    Ok(Monotonicity { direction, bounds })
}

pub(crate) fn is_ccw(poly: &Polygon) -> bool {
    let n = poly.len();
    let mut area2 = 0.0;
    for i in 0..n {
        let a = poly.vertex(i).pos;
        let b = poly.vertex(poly.c_next(i)).pos;
        area2 += a.x * b.y - b.x * a.y;
    }
    area2 > 0.0
}

fn reflex_edge_vectors(poly: &Polygon, cfg: &GeomCfg) -> Vec<Vec2> {
    let ccw = is_ccw(poly);
    let n = poly.len();
    let mut vecs = Vec::new();
    for i in 0..n {
        let prev = poly.vertex(poly.c_prev(i)).pos;
        let corner = poly.vertex(i).pos;
        let next = poly.vertex(poly.c_next(i)).pos;
        let turn = signed_area(prev, corner, next);
        let is_reflex = if ccw {
            turn < -cfg.eps_det
        } else {
            turn > cfg.eps_det
        };
        if is_reflex {
            vecs.push(corner - prev);
            vecs.push(next - corner);
        }
    }
    vecs
}

/// Direction whose line, when passed through the origin, bisects `a` and `b`
/// perpendicularly, canonicalized to a single representative per line
/// (matches `getMonotonicityLineFromVector`'s orientation normalization).
fn monotonicity_line_from_vectors(a: Vec2, b: Vec2) -> Vec2 {
    let au = a.normalize();
    let bu = b.normalize();
    let mut bis = au + bu;
    if bis.norm() < 1e-12 {
        bis = Vec2::new(-au.y, au.x);
    }
    let perp = Vec2::new(-bis.y, bis.x);
    canonicalize_line_direction(perp)
}

fn canonicalize_line_direction(v: Vec2) -> Vec2 {
    if v.x < 0.0 || (v.x.abs() < 1e-12 && v.y < 0.0) {
        -v
    } else {
        v
    }
}

/// Walk the boundary starting at the projection-minimum vertex and check for
/// at most one rising-to-falling reversal.
fn is_monotone_wrt(poly: &Polygon, dir: Vec2, cfg: &GeomCfg) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let proj: Vec<f64> = (0..n)
        .map(|i| poly.vertex(i).pos.to_vector().dot(&dir))
        .collect();
    let mut m = 0;
    for i in 1..n {
        if proj[i] < proj[m] {
            m = i;
        }
    }
    let mut rising = true;
    let mut last = proj[m];
    for k in 1..=n {
        let idx = (m + k) % n;
        let cur = proj[idx];
        if cur > last + cfg.eps_point {
            if !rising {
                return false;
            }
        } else if cur < last - cfg.eps_point {
            rising = false;
        }
        last = cur;
    }
    true
}

fn find_monotonicity_direction(poly: &Polygon, cfg: &GeomCfg) -> Result<Vec2> {
    let mut vecs = reflex_edge_vectors(poly, cfg);
    if vecs.is_empty() {
        return Ok(Vec2::new(1.0, 0.0));
    }
    vecs.sort_by(|a, b| {
        a.y.atan2(a.x)
            .partial_cmp(&b.y.atan2(b.x))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let m = vecs.len();
    for k in 0..m {
        let a = vecs[k];
        let b = vecs[(k + 1) % m];
        let candidate = monotonicity_line_from_vectors(a, b);
        if is_monotone_wrt(poly, candidate, cfg) {
            return Ok(candidate);
        }
    }
    Err(Error::NotMonotone)
}

/// Verify monotonicity along a caller-supplied direction directly, skipping
/// the reflex-vertex candidate search `analyze` performs. Used by callers
/// that already know (or are willing to assume) a monotonicity direction,
/// e.g. the CLI's default "assume x-monotone" mode.
pub fn analyze_along(poly: &Polygon, direction: Vec2, cfg: &GeomCfg) -> Result<Monotonicity> {
    if !is_monotone_wrt(poly, direction, cfg) {
        return Err(Error::NotMonotone);
    }
    Ok(Monotonicity {
        direction,
        bounds: compute_bounds(poly, direction),
    })
}

fn compute_bounds(poly: &Polygon, dir: Vec2) -> BoundingData {
    let n = poly.len();
    let mut x_min_idx = 0;
    let mut x_max_idx = 0;
    let mut y_min_idx = 0;
    let mut y_max_idx = 0;
    let mut mon_min_idx = 0;
    let mut mon_max_idx = 0;
    let mut mon_min_val = poly.vertex(0).pos.to_vector().dot(&dir);
    let mut mon_max_val = mon_min_val;

    for i in 1..n {
        let p = poly.vertex(i).pos;
        if p.x < poly.vertex(x_min_idx).pos.x {
            x_min_idx = i;
        }
        if p.x > poly.vertex(x_max_idx).pos.x {
            x_max_idx = i;
        }
        if p.y < poly.vertex(y_min_idx).pos.y {
            y_min_idx = i;
        }
        if p.y > poly.vertex(y_max_idx).pos.y {
            y_max_idx = i;
        }
        let proj = p.to_vector().dot(&dir);
        if proj < mon_min_val {
            mon_min_val = proj;
            mon_min_idx = i;
        }
        if proj > mon_max_val {
            mon_max_val = proj;
            mon_max_idx = i;
        }
    }

    BoundingData {
        x_min_idx,
        x_max_idx,
        y_min_idx,
        y_max_idx,
        mon_min_idx,
        mon_max_idx,
        x_min: poly.vertex(x_min_idx).pos.x,
        x_max: poly.vertex(x_max_idx).pos.x,
        y_min: poly.vertex(y_min_idx).pos.y,
        y_max: poly.vertex(y_max_idx).pos.y,
        mon_min: poly.vertex(mon_min_idx).pos,
        mon_max: poly.vertex(mon_max_idx).pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Vertex};

    fn square() -> Polygon {
        let vertices = vec![
            Vertex { id: 0, pos: Point::new(0.0, 0.0) },
            Vertex { id: 1, pos: Point::new(2.0, 0.0) },
            Vertex { id: 2, pos: Point::new(2.0, 1.0) },
            Vertex { id: 3, pos: Point::new(0.0, 1.0) },
        ];
        let edges = vec![
            Edge { id: 0, u: 0, v: 1, weight: 1.0 },
            Edge { id: 1, u: 1, v: 2, weight: 1.0 },
            Edge { id: 2, u: 2, v: 3, weight: 1.0 },
            Edge { id: 3, u: 3, v: 0, weight: 1.0 },
        ];
        Polygon::build(vertices, edges).unwrap()
    }

    // A "house" shape with one reflex vertex carved into the top edge.
    fn notched_roof() -> Polygon {
        let vertices = vec![
            Vertex { id: 0, pos: Point::new(0.0, 0.0) },
            Vertex { id: 1, pos: Point::new(4.0, 0.0) },
            Vertex { id: 2, pos: Point::new(4.0, 2.0) },
            Vertex { id: 3, pos: Point::new(2.0, 1.0) }, // reflex
            Vertex { id: 4, pos: Point::new(0.0, 2.0) },
        ];
        let edges = vec![
            Edge { id: 0, u: 0, v: 1, weight: 1.0 },
            Edge { id: 1, u: 1, v: 2, weight: 1.0 },
            Edge { id: 2, u: 2, v: 3, weight: 1.0 },
            Edge { id: 3, u: 3, v: 4, weight: 1.0 },
            Edge { id: 4, u: 4, v: 0, weight: 1.0 },
        ];
        Polygon::build(vertices, edges).unwrap()
    }

    #[test]
    fn convex_polygon_defaults_to_x_axis() {
        let poly = square();
        let cfg = GeomCfg::default();
        let result = analyze(&poly, &cfg).unwrap();
        assert!((result.direction.x - 1.0).abs() < 1e-9);
        assert!(result.direction.y.abs() < 1e-9);
    }

    #[test]
    fn convex_bounds_match_extremal_vertices() {
        let poly = square();
        let cfg = GeomCfg::default();
        let result = analyze(&poly, &cfg).unwrap();
        assert_eq!(result.bounds.x_min_idx, 0);
        assert_eq!(result.bounds.x_max_idx, 1);
        assert_eq!(result.bounds.y_max_idx, 2);
    }

    #[test]
    fn notched_roof_is_detected_monotone() {
        let poly = notched_roof();
        let cfg = GeomCfg::default();
        let result = analyze(&poly, &cfg).unwrap();
        assert!(is_monotone_wrt(&poly, result.direction, &cfg));
    }

    #[test]
    fn analyze_along_accepts_a_genuinely_x_monotone_polygon() {
        let poly = square();
        let cfg = GeomCfg::default();
        let result = analyze_along(&poly, Vec2::new(1.0, 0.0), &cfg).unwrap();
        assert_eq!(result.bounds.x_min_idx, 0);
    }

    #[test]
    fn analyze_along_rejects_a_direction_the_polygon_is_not_monotone_in() {
        let poly = notched_roof();
        let cfg = GeomCfg::default();
        let err = analyze_along(&poly, Vec2::new(0.0, 1.0), &cfg).unwrap_err();
        assert!(matches!(err, Error::NotMonotone));
    }
}

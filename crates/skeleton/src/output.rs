//! Deterministic mesh output: writes the skeleton plus the original polygon
//! as a plain-text vertex/face listing.
//!
//! Grounded in `original_source/monos/src/Monos.cpp`'s `write()`/`writeOBJ()`:
//! every node becomes a `v` line and every arc a 2-vertex `f` line (face, not
//! triangle, matching the original's degenerate-face-per-edge convention),
//! coordinates normalized against the polygon's bounding box so two runs on
//! the same input produce byte-identical output, and the input polygon's own
//! boundary is appended last as one closed face.

use std::fmt::Write as _;

use crate::geom::Point;
use crate::model::Polygon;
use crate::monotone::BoundingData;
use crate::skeleton::Skeleton;

/// Render a skeleton and its source polygon as an OBJ-like mesh:
/// `v x y 0` lines for every (enabled) node, then `f a b` lines (1-indexed)
/// for every (enabled, non-ray) arc, then one closing `f` line listing the
/// whole polygon boundary in order.
///
/// Coordinates are normalized so the polygon's bounding box maps to
/// `[0, 1]^2`; a degenerate (zero-width or zero-height) bounding box maps
/// that axis to a constant `0.0` rather than dividing by zero.
pub fn write_mesh(poly: &Polygon, bounds: &BoundingData, skeleton: &Skeleton) -> String {
    let mut out = String::new();
    let norm = |p: Point| normalize(p, bounds);

    let mut node_line = vec![0usize; skeleton.nodes.len()];
    let mut next_line = 1usize;
    for (i, node) in skeleton.nodes.iter().enumerate() {
        if node.is_disabled() {
            continue;
        }
        let (x, y) = norm(node.point);
        let _ = writeln!(out, "v {:.9} {:.9} 0", x, y);
        node_line[i] = next_line;
        next_line += 1;
    }

    for arc in &skeleton.arcs {
        if arc.is_disabled() || arc.is_ray() {
            continue;
        }
        let Some(second) = arc.second_node else { continue };
        let a = node_line[arc.first_node];
        let b = node_line[second];
        if a == 0 || b == 0 {
            continue;
        }
        let _ = writeln!(out, "f {} {}", a, b);
    }

    let poly_start = next_line;
    for v in poly.vertices() {
        let (x, y) = norm(v.pos);
        let _ = writeln!(out, "v {:.9} {:.9} 0", x, y);
    }
    let face_indices: Vec<String> = (0..poly.len()).map(|k| (poly_start + k).to_string()).collect();
    let _ = writeln!(out, "f {}", face_indices.join(" "));

    out
}

fn normalize(p: Point, bounds: &BoundingData) -> (f64, f64) {
    let width = bounds.x_max - bounds.x_min;
    let height = bounds.y_max - bounds.y_min;
    let x = if width > 0.0 { (p.x - bounds.x_min) / width } else { 0.0 };
    let y = if height > 0.0 { (p.y - bounds.y_min) / height } else { 0.0 };
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::GeomCfg;
    use crate::model::{Edge, Vertex};
    use crate::{chain, monotone};

    fn square() -> Polygon {
        let vertices = vec![
            Vertex { id: 0, pos: Point::new(0.0, 0.0) },
            Vertex { id: 1, pos: Point::new(2.0, 0.0) },
            Vertex { id: 2, pos: Point::new(2.0, 2.0) },
            Vertex { id: 3, pos: Point::new(0.0, 2.0) },
        ];
        let edges = vec![
            Edge { id: 0, u: 0, v: 1, weight: 1.0 },
            Edge { id: 1, u: 1, v: 2, weight: 1.0 },
            Edge { id: 2, u: 2, v: 3, weight: 1.0 },
            Edge { id: 3, u: 3, v: 0, weight: 1.0 },
        ];
        Polygon::build(vertices, edges).unwrap()
    }

    #[test]
    fn write_mesh_includes_polygon_face_last() {
        let cfg = GeomCfg::default();
        let poly = square();
        let mono = monotone::analyze(&poly, &cfg).unwrap();
        let (a, b, geoms) = chain::decompose(&poly, &mono);
        let mut upper = crate::wavefront::Wavefront::build(a, geoms.clone(), cfg).unwrap();
        let mut lower = crate::wavefront::Wavefront::build(b, geoms, cfg).unwrap();
        upper.run().unwrap();
        lower.run().unwrap();
        let skeleton = crate::skeleton::merge_upper_lower(upper, lower, &poly, &mono, &cfg).unwrap();

        let text = write_mesh(&poly, &mono.bounds, &skeleton);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.iter().any(|l| l.starts_with("v ")));
        let last_face = lines.iter().rev().find(|l| l.starts_with("f ")).unwrap();
        assert_eq!(last_face.split_whitespace().count(), poly.len() + 1);
    }

    #[test]
    fn normalize_handles_degenerate_bbox() {
        let bounds = BoundingData {
            x_min_idx: 0,
            x_max_idx: 0,
            y_min_idx: 0,
            y_max_idx: 0,
            mon_min_idx: 0,
            mon_max_idx: 0,
            x_min: 5.0,
            x_max: 5.0,
            y_min: 5.0,
            y_max: 5.0,
            mon_min: Point::new(5.0, 5.0),
            mon_max: Point::new(5.0, 5.0),
        };
        assert_eq!(normalize(Point::new(5.0, 5.0), &bounds), (0.0, 0.0));
    }
}

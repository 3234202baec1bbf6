//! Input model: vertices, weighted edges, and the closed cyclic polygon they form.
//!
//! Grounded in `original_source/monos/inc/cgTypes.h`'s `InputPoints` /
//! `InputWeights` / `IndexEdge` / `Polygon = vector<IndexEdge>` plus the
//! `cNext`/`cPrev` cyclic-index helpers used throughout `Data.cpp`.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geom::Point;

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub id: u32,
    pub pos: Point,
}

#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub id: u32,
    pub u: u32,
    pub v: u32,
    pub weight: f64,
}

/// A closed, simple, cyclically-ordered polygon boundary.
///
/// `vertices[i]` is the source of `edges[i]`, and `edges[i].v == vertices[c_next(i)].id`;
/// both arrays are canonicalized into a single traversal order by [`Polygon::build`].
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Polygon {
    /// Validate and canonicalize a vertex/edge soup into a traversal-ordered polygon.
    ///
    /// Every vertex id must appear as `u` of exactly one edge and `v` of
    /// exactly one edge, the `u -> v` links must form a single cycle through
    /// all vertices, and every weight must be finite and strictly positive.
    pub fn build(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Result<Polygon> {
        if vertices.len() < 3 {
            return Err(Error::MalformedInput(
                "polygon needs at least 3 vertices".into(),
            ));
        }
        if edges.len() != vertices.len() {
            return Err(Error::MalformedInput(
                "edge count must equal vertex count".into(),
            ));
        }

        let mut pos_by_id: HashMap<u32, Point> = HashMap::with_capacity(vertices.len());
        for v in &vertices {
            if pos_by_id.insert(v.id, v.pos).is_some() {
                return Err(Error::MalformedInput(format!("duplicate vertex id {}", v.id)));
            }
        }

        let mut out_by_u: HashMap<u32, &Edge> = HashMap::with_capacity(edges.len());
        let mut in_count: HashMap<u32, u32> = HashMap::with_capacity(edges.len());
        for e in &edges {
            if !e.weight.is_finite() || e.weight <= 0.0 {
                return Err(Error::MalformedInput(format!(
                    "edge {} has non-positive or non-finite weight {}",
                    e.id, e.weight
                )));
            }
            if !pos_by_id.contains_key(&e.u) || !pos_by_id.contains_key(&e.v) {
                return Err(Error::MalformedInput(format!(
                    "edge {} references an unknown vertex",
                    e.id
                )));
            }
            if out_by_u.insert(e.u, e).is_some() {
                return Err(Error::MalformedInput(format!(
                    "vertex {} has more than one outgoing edge",
                    e.u
                )));
            }
            *in_count.entry(e.v).or_insert(0) += 1;
        }
        for v in &vertices {
            if in_count.get(&v.id).copied().unwrap_or(0) != 1 {
                return Err(Error::MalformedInput(format!(
                    "vertex {} does not have exactly one incoming edge",
                    v.id
                )));
            }
        }

        let start = vertices[0].id;
        let mut ordered_vertices = Vec::with_capacity(vertices.len());
        let mut ordered_edges = Vec::with_capacity(edges.len());
        let mut cur = start;
        for _ in 0..vertices.len() {
            let edge = *out_by_u
                .get(&cur)
                .ok_or_else(|| Error::MalformedInput(format!("vertex {} has no outgoing edge", cur)))?;
            ordered_vertices.push(Vertex {
                id: cur,
                pos: pos_by_id[&cur],
            });
            ordered_edges.push(*edge);
            cur = edge.v;
        }
        if cur != start {
            return Err(Error::MalformedInput(
                "edges do not form a single closed cycle through all vertices".into(),
            ));
        }

        Ok(Polygon {
            vertices: ordered_vertices,
            edges: ordered_edges,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> Vertex {
        self.vertices[i]
    }

    #[inline]
    pub fn edge(&self, i: usize) -> Edge {
        self.edges[i]
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn c_next(&self, i: usize) -> usize {
        (i + 1) % self.vertices.len()
    }

    #[inline]
    pub fn c_prev(&self, i: usize) -> usize {
        (i + self.vertices.len() - 1) % self.vertices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> (Vec<Vertex>, Vec<Edge>) {
        let vertices = vec![
            Vertex { id: 0, pos: Point::new(0.0, 0.0) },
            Vertex { id: 1, pos: Point::new(1.0, 0.0) },
            Vertex { id: 2, pos: Point::new(1.0, 1.0) },
            Vertex { id: 3, pos: Point::new(0.0, 1.0) },
        ];
        let edges = vec![
            Edge { id: 0, u: 0, v: 1, weight: 1.0 },
            Edge { id: 1, u: 1, v: 2, weight: 1.0 },
            Edge { id: 2, u: 2, v: 3, weight: 1.0 },
            Edge { id: 3, u: 3, v: 0, weight: 1.0 },
        ];
        (vertices, edges)
    }

    #[test]
    fn builds_square_in_traversal_order() {
        let (vertices, edges) = square();
        let poly = Polygon::build(vertices, edges).unwrap();
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.c_next(3), 0);
        assert_eq!(poly.c_prev(0), 3);
    }

    #[test]
    fn rejects_dangling_edge() {
        let (vertices, mut edges) = square();
        edges[2].v = 0;
        let err = Polygon::build(vertices, edges).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn rejects_non_positive_weight() {
        let (vertices, mut edges) = square();
        edges[0].weight = 0.0;
        let err = Polygon::build(vertices, edges).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}

//! Merging the upper and lower chain wavefronts into one skeleton graph.
//!
//! Grounded in `original_source/monos/inc/Skeleton.h`'s
//! `MergeUpperLowerSkeleton`/`handleMerge`: neither chain's wavefront ever
//! computes a bisector at `mon_min` or `mon_max`, since each anchor's true
//! two incident edges (the angle actually carved into the polygon there)
//! are split one to each chain, and a single chain's [`crate::wavefront`]
//! only ever sees one of them. The merger builds those two seam bisectors
//! itself, splices them into a small cyclic "merge boundary" alongside
//! whatever residual arc each chain's wavefront left open (at most one per
//! chain, see [`crate::wavefront`]'s module doc), and collapses that
//! boundary exactly like a chain's own wavefront would — the same
//! offset-line algebra applies, since every entity spliced in already
//! satisfies the relevant edge's offset invariant.

use crate::error::{Error, Result};
use crate::geom::{bisector_collapse_time, weighted_bisector, GeomCfg, Point, Vec2};
use crate::model::Polygon;
use crate::monotone::Monotonicity;
use crate::wavefront::{Arc, EdgeGeom, Node, NodeType, Wavefront};

/// The final, merged skeleton: one combined node/arc arena.
pub struct Skeleton {
    pub nodes: Vec<Node>,
    pub arcs: Vec<Arc>,
}

/// One vertex on the merge boundary: its current point/birth-time/bisector
/// direction, and the arc (already present in the combined arena) whose
/// open end it represents.
#[derive(Clone, Copy)]
struct BoundaryVertex {
    point: Point,
    time: f64,
    dir: Vec2,
    arc_idx: usize,
}

/// Merge the upper and lower chain wavefronts sharing the same two anchors
/// (`mon_min`, `mon_max`) into one skeleton.
pub fn merge_upper_lower(upper: Wavefront, lower: Wavefront, poly: &Polygon, mono: &Monotonicity, cfg: &GeomCfg) -> Result<Skeleton> {
    let upper_open = upper.open_arcs();
    let lower_open_raw = lower.open_arcs();
    if upper_open.len() > 1 || lower_open_raw.len() > 1 {
        return Err(Error::NumericInconsistency(
            "more than one residual arc on a chain".into(),
        ));
    }
    let lower_offset = upper.arcs.len();

    let (mut nodes, mut arcs) = merge_arenas(&upper, &lower);
    let lower_open: Option<usize> = lower_open_raw.first().map(|i| i + lower_offset);
    let upper_open: Option<usize> = upper_open.first().copied();
    let (anchor_min, anchor_max) = upper.anchor_nodes();

    let min_idx = mono.bounds.mon_min_idx;
    let max_idx = mono.bounds.mon_max_idx;
    // chain_a (upper) runs min -> max, so its own edge touching mon_min is
    // poly.edge(min_idx); its own edge touching mon_max is the edge arriving
    // there, poly.edge(poly.c_prev(max_idx)). chain_b (lower) runs the other
    // way around and owns the two remaining edges at those vertices.
    let edge_a_min = poly.edge(min_idx).id;
    let edge_b_min = poly.edge(poly.c_prev(min_idx)).id;
    let edge_a_max = poly.edge(poly.c_prev(max_idx)).id;
    let edge_b_max = poly.edge(max_idx).id;

    let eg = |id: u32| -> Result<EdgeGeom> {
        upper
            .edge_geom(id)
            .or_else(|| lower.edge_geom(id))
            .ok_or_else(|| Error::NumericInconsistency(format!("edge {id} has no geometry")))
    };
    let (eg_a_min, eg_b_min, eg_a_max, eg_b_max) = (eg(edge_a_min)?, eg(edge_b_min)?, eg(edge_a_max)?, eg(edge_b_max)?);

    let seam_min = weighted_bisector(nodes[anchor_min].point, eg_b_min.normal, eg_b_min.weight, eg_a_min.normal, eg_a_min.weight, cfg);
    let seam_max = weighted_bisector(nodes[anchor_max].point, eg_a_max.normal, eg_a_max.weight, eg_b_max.normal, eg_b_max.weight, cfg);

    let v_min_arc = push_seam_arc(&mut arcs, anchor_min, edge_b_min, edge_a_min, seam_min);
    let v_max_arc = push_seam_arc(&mut arcs, anchor_max, edge_a_max, edge_b_max, seam_max);

    // Build the cyclic boundary: v_min -[edge_a_min]-> (chain_a residual or
    // v_max) -[edge_a_max]-> v_max -[edge_b_max]-> (chain_b residual or
    // v_min) -[edge_b_min]-> back to v_min.
    let mut ring: Vec<(BoundaryVertex, u32)> = Vec::with_capacity(4);
    ring.push((
        BoundaryVertex { point: nodes[anchor_min].point, time: 0.0, dir: seam_min.direction(), arc_idx: v_min_arc },
        edge_a_min,
    ));
    if let Some(idx) = upper_open {
        ring.push((residual_vertex(&nodes, &arcs, idx), edge_a_max));
    }
    ring.push((
        BoundaryVertex { point: nodes[anchor_max].point, time: 0.0, dir: seam_max.direction(), arc_idx: v_max_arc },
        edge_b_max,
    ));
    if let Some(idx) = lower_open {
        ring.push((residual_vertex(&nodes, &arcs, idx), edge_b_min));
    }

    collapse_ring(&mut nodes, &mut arcs, ring, &|id| eg(id).ok(), cfg)?;

    Ok(Skeleton { nodes, arcs })
}

fn residual_vertex(nodes: &[Node], arcs: &[Arc], arc_idx: usize) -> BoundaryVertex {
    let node = nodes[arcs[arc_idx].first_node];
    BoundaryVertex { point: node.point, time: node.time, dir: arcs[arc_idx].bis.direction(), arc_idx }
}

fn push_seam_arc(arcs: &mut Vec<Arc>, anchor_node: usize, left_edge: u32, right_edge: u32, bis: crate::geom::Bisector) -> usize {
    let idx = arcs.len();
    arcs.push(Arc::new_ray(anchor_node, left_edge, right_edge, bis));
    idx
}

/// Collapse the cyclic merge boundary pairwise, exactly like a chain's own
/// wavefront, until a single meeting point closes the seam.
fn collapse_ring(
    nodes: &mut Vec<Node>,
    arcs: &mut Vec<Arc>,
    mut ring: Vec<(BoundaryVertex, u32)>,
    edge_geom: &dyn Fn(u32) -> Option<EdgeGeom>,
    cfg: &GeomCfg,
) -> Result<()> {
    while ring.len() > 2 {
        let n = ring.len();
        let mut best: Option<(usize, f64, Point)> = None;
        for i in 0..n {
            let j = (i + 1) % n;
            let (vi, edge_id) = ring[i];
            let (vj, _) = ring[j];
            let already_met = (vi.point - vj.point).norm() <= cfg.eps_point && (vi.time - vj.time).abs() <= cfg.eps_time;
            let candidate = if already_met {
                Some((vi.time.max(vj.time), vi.point))
            } else {
                match edge_geom(edge_id) {
                    Some(eg) => bisector_collapse_time(vi.point, vi.time, vi.dir, vj.point, vj.time, vj.dir, eg.dir, cfg)?,
                    None => None,
                }
            };
            if let Some((t, p)) = candidate {
                if best.map_or(true, |(_, bt, _)| t < bt) {
                    best = Some((i, t, p));
                }
            }
        }
        let (i, t, p) = best.ok_or_else(|| Error::NumericInconsistency("merge boundary never closes".into()))?;
        let j = (i + 1) % n;

        let new_node = nodes.len();
        nodes.push(Node::new(p, t, NodeType::Merge));
        arcs[ring[i].0.arc_idx].set_second_node(new_node);
        arcs[ring[j].0.arc_idx].set_second_node(new_node);

        let next_edge = ring[j].1;
        ring.rotate_left(i);
        let new_left_edge = ring[n - 1].1;
        let l = edge_geom(new_left_edge)
            .ok_or_else(|| Error::NumericInconsistency("merge boundary edge missing geometry".into()))?;
        let r = edge_geom(next_edge)
            .ok_or_else(|| Error::NumericInconsistency("merge boundary edge missing geometry".into()))?;
        let bis = weighted_bisector(p, l.normal, l.weight, r.normal, r.weight, cfg);
        let new_arc_idx = push_seam_arc(arcs, new_node, new_left_edge, next_edge, bis);

        let merged = BoundaryVertex { point: p, time: t, dir: bis.direction(), arc_idx: new_arc_idx };
        let mut new_ring = Vec::with_capacity(n - 1);
        new_ring.push((merged, next_edge));
        new_ring.extend(ring.drain(2..));
        ring = new_ring;
    }

    if ring.len() == 2 {
        let (v0, edge0) = ring[0];
        let (v1, edge1) = ring[1];
        // The previous step can leave both remaining entities already
        // coincident (a degenerate multi-way tie, e.g. a regular convex
        // polygon where every bisector meets at one point simultaneously) —
        // in that case there is no edge left to solve against, the point is
        // just itself.
        let already_met = (v0.point - v1.point).norm() <= cfg.eps_point && (v0.time - v1.time).abs() <= cfg.eps_time;
        let point = if already_met {
            Some((v0.time.max(v1.time), v0.point))
        } else {
            let via_edge0 = match edge_geom(edge0) {
                Some(eg) => bisector_collapse_time(v0.point, v0.time, v0.dir, v1.point, v1.time, v1.dir, eg.dir, cfg)?,
                None => None,
            };
            match via_edge0 {
                Some(result) => Some(result),
                None => match edge_geom(edge1) {
                    Some(eg) => bisector_collapse_time(v0.point, v0.time, v0.dir, v1.point, v1.time, v1.dir, eg.dir, cfg)?,
                    None => None,
                },
            }
        };
        let (t, p) = point.ok_or_else(|| Error::NumericInconsistency("merge boundary's last two rays never meet".into()))?;
        let new_node = nodes.len();
        nodes.push(Node::new(p, t, NodeType::Merge));
        arcs[v0.arc_idx].set_second_node(new_node);
        arcs[v1.arc_idx].set_second_node(new_node);
    }

    Ok(())
}

/// Copy both arenas into one, unifying the two chains' shared anchor nodes
/// (they describe the same geometric point) and remapping every arc's node
/// indices accordingly.
fn merge_arenas(upper: &Wavefront, lower: &Wavefront) -> (Vec<Node>, Vec<Arc>) {
    let (u_min, u_max) = upper.anchor_nodes();
    let (l_min, l_max) = lower.anchor_nodes();

    let mut nodes = upper.nodes.clone();
    let mut arcs = upper.arcs.clone();

    let mut lower_index_map = vec![0usize; lower.nodes.len()];
    for (i, node) in lower.nodes.iter().enumerate() {
        if i == l_min {
            lower_index_map[i] = u_min;
        } else if i == l_max {
            lower_index_map[i] = u_max;
        } else {
            lower_index_map[i] = nodes.len();
            nodes.push(*node);
        }
    }

    for arc in &lower.arcs {
        let mut remapped = arc.clone();
        remapped.first_node = lower_index_map[arc.first_node];
        remapped.second_node = arc.second_node.map(|n| lower_index_map[n]);
        arcs.push(remapped);
    }

    (nodes, arcs)
}

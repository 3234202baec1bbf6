//! Weighted straight skeleton of a monotone simple polygon.
//!
//! Pipeline: [`model::Polygon::build`] validates the input, [`monotone::analyze`]
//! finds a monotonicity direction and bounding data, [`chain::decompose`]
//! splits the boundary into the two chains meeting at that direction's
//! extremal vertices, each chain is propagated independently by
//! [`wavefront::Wavefront`], and [`skeleton::merge_upper_lower`] reconciles
//! the two chains' results into one graph.

pub mod chain;
pub mod error;
pub mod event_queue;
pub mod geom;
pub mod model;
pub mod monotone;
pub mod output;
pub mod skeleton;
pub mod wavefront;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use geom::GeomCfg;
pub use model::{Edge, Polygon, Vertex};
pub use skeleton::Skeleton;

/// Common imports for callers.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geom::{GeomCfg, Point, Vec2};
    pub use crate::model::{Edge, Polygon, Vertex};
    pub use crate::skeleton::Skeleton;
    pub use crate::{compute_skeleton, VERSION};
}

/// Compute the weighted straight skeleton of `polygon`, searching for a
/// monotonicity direction via [`monotone::analyze`].
pub fn compute_skeleton(polygon: &model::Polygon, cfg: &geom::GeomCfg) -> error::Result<skeleton::Skeleton> {
    let mono = monotone::analyze(polygon, cfg)?;
    compute_skeleton_from(polygon, mono, cfg)
}

/// Compute the weighted straight skeleton of `polygon`, verifying (rather
/// than searching for) monotonicity along a caller-supplied `direction`.
/// Used by the CLI's default "assume x-monotone" mode.
pub fn compute_skeleton_along(
    polygon: &model::Polygon,
    direction: geom::Vec2,
    cfg: &geom::GeomCfg,
) -> error::Result<skeleton::Skeleton> {
    let mono = monotone::analyze_along(polygon, direction, cfg)?;
    compute_skeleton_from(polygon, mono, cfg)
}

fn compute_skeleton_from(
    polygon: &model::Polygon,
    mono: monotone::Monotonicity,
    cfg: &geom::GeomCfg,
) -> error::Result<skeleton::Skeleton> {
    let (chain_a, chain_b, edge_geoms) = chain::decompose(polygon, &mono);
    let mut wf_a = wavefront::Wavefront::build(chain_a, edge_geoms.clone(), *cfg)?;
    let mut wf_b = wavefront::Wavefront::build(chain_b, edge_geoms, *cfg)?;
    wf_a.run()?;
    wf_b.run()?;
    skeleton::merge_upper_lower(wf_a, wf_b, polygon, &mono, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::model::{Edge, Vertex};

    #[test]
    fn computes_skeleton_for_a_square() {
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
        let poly = model::Polygon::build(vertices, edges).unwrap();
        let cfg = geom::GeomCfg::default();
        let skeleton = compute_skeleton(&poly, &cfg).unwrap();
        assert!(!skeleton.nodes.is_empty());
    }
}

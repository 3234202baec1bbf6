//! Geometry kernel: points, predicates, and weighted bisectors.
//!
//! Layout follows the teacher's `geom2/mod.rs`: a handful of focused
//! submodules re-exported from here.

pub mod bisector;
pub mod predicates;
pub mod types;

pub use bisector::{bisector_collapse_time, weighted_bisector, Bisector, BisectorKind};
pub use predicates::{angle_of, left_turn, parallel, right_turn, same_direction, wrap_angle};
pub use types::{GeomCfg, Point, Vec2};

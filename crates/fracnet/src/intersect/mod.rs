//! Pairwise fracture intersection and network assembly.
//!
//! Purpose
//! - Turn a fracture population into a network of intersection segments
//!   (edges) and singular touch points (vertices).
//! - Per pair: bounding-sphere prune, then boundary-edge/plane solves, then
//!   classification into nothing, touching, or a proper segment.
//! - The sweep additionally crosses each new segment against all earlier
//!   ones; those crossings become vertices too.
//!
//! Why this design
//! - Degenerate outcomes (parallel planes, out-of-bounds hits, singular
//!   solves) are routine in an all-pairs sweep, so the kernels answer
//!   `None` instead of erroring.
//! - `verify_network` re-checks a finished network through an independent
//!   route (inverted plane frames plus 2D membership), so sweep regressions
//!   surface in tests and behind the CLI `--verify` flag.
//!
//! Code cross-refs: `geom::solve_cramer_3x3`, `geom::point_on_segment`,
//! `geom::point_in_quadrilateral_3d`; `scanline` reuses
//! [`intersect_line_plane`].

mod pair;
mod sweep;
mod types;
mod verify;

pub use pair::{intersect_line_line, intersect_line_plane, intersect_pair, PairIntersection};
pub use sweep::sweep;
pub use types::{Edge, Network, Vertex, VertexOutcome};
pub use verify::{verify_network, VerifyError};

#[cfg(test)]
mod tests;

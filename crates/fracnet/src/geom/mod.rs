//! Core geometry: tolerances, fracture and domain types, small dense
//! solvers, and the point/segment/polygon predicates.
//!
//! Purpose
//! - Centralize every tolerance in [`Tol`] so callers never compare against
//!   ad hoc literals.
//! - Keep the predicates tolerance-explicit: each takes the epsilon it
//!   compares against, and degenerate inputs yield a clean "no" rather than
//!   an error.
//! - Solvers split by failure semantics: a vanishing Cramer determinant is
//!   an expected outcome (`None`), a vanishing Gauss-Jordan pivot is a
//!   fault ([`SolveError::SingularMatrix`]).
//!
//! Code cross-refs: `intersect::pair`, `intersect::verify`, `scanline`,
//! `gen`.

mod predicates;
mod solvers;
mod types;

pub use predicates::{
    distance_point_to_line, lines_parallel, point_in_polygon_2d, point_in_quadrilateral_3d,
    point_on_segment,
};
pub use solvers::{gauss_jordan_invert, solve_cramer_3x3, SolveError};
pub use types::{BoundingSphere, Domain, Fracture, FractureError, Tol};

#[cfg(test)]
mod tests;

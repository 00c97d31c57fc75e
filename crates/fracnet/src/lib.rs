//! Discrete fracture network geometry and calibration.
//!
//! Pipeline: a generated population of planar quadrilateral fractures is
//! intersected pairwise into a network of segments and singular points;
//! synthetic scanlines sample the spacing between successive intersection
//! points; and the calibration runner perturbs fracture positions (simulated
//! annealing, then MCMC) until the spacing histogram matches a target
//! distribution.
//!
//! API Policy
//! - Project-internal; no stable public API. Prefer design improvements over
//!   compatibility.
//! - Every stochastic component draws from one shared [`random::UniformSource`]
//!   stream, so a single seed reproduces a whole run.

pub mod calibrate;
pub mod gen;
pub mod geom;
pub mod intersect;
pub mod random;
pub mod scanline;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Double-precision 3-vector, used for points and directions alike.
pub type Point3 = nalgebra::Vector3<f64>;

pub use geom::Tol;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::calibrate::{
        chi_square, CalibrateError, CalibrateParams, Calibrator, Histogram, PhaseStats,
        TargetDistribution,
    };
    pub use crate::gen::{generate_population, FractureGenParams, GenError};
    pub use crate::geom::{BoundingSphere, Domain, Fracture, Tol};
    pub use crate::intersect::{
        intersect_line_line, intersect_line_plane, intersect_pair, sweep, verify_network, Edge,
        Network, PairIntersection, Vertex,
    };
    pub use crate::random::{ScriptedUniform, SeededUniform, UniformSource};
    pub use crate::scanline::{
        full_sample, generate_scanlines, incremental_sample, FixedAxis, Hit, Scanline,
    };
    pub use crate::Point3;
}

//! Random fracture population generation.
//!
//! Produces rectangular fracture elements with corners inside the domain
//! box, drawing every value from the shared uniform stream so that one
//! seed reproduces the whole pipeline.
//!
//! Draw order per attempt: center (x, y, z), normal direction (2 draws),
//! in-plane rotation (1 draw), side lengths (2 draws).

use std::f64::consts::TAU;
use std::fmt;

use crate::geom::{Domain, Fracture};
use crate::random::UniformSource;
use crate::Point3;

/// Generation failures.
#[derive(Debug)]
pub enum GenError {
    InvalidParams { reason: String },
    DegenerateSample { reason: String },
}

impl GenError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateSample {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid generation params: {reason}"),
            Self::DegenerateSample { reason } => write!(f, "degenerate sample: {reason}"),
        }
    }
}

impl std::error::Error for GenError {}

/// Population size, element size range, and retry budget.
#[derive(Clone, Copy, Debug)]
pub struct FractureGenParams {
    pub count: usize,
    pub side_min: f64,
    pub side_max: f64,
    pub aperture: f64,
    /// Placement attempts per fracture before giving up.
    pub max_attempts: u32,
}

impl FractureGenParams {
    pub fn validate(&self, domain: &Domain) -> Result<(), GenError> {
        if self.count == 0 {
            return Err(GenError::invalid("count must be >= 1"));
        }
        if !(self.side_min > 0.0) || self.side_min > self.side_max {
            return Err(GenError::invalid("need 0 < side_min <= side_max"));
        }
        if !(self.aperture >= 0.0) {
            return Err(GenError::invalid("aperture must be >= 0"));
        }
        if self.max_attempts == 0 {
            return Err(GenError::invalid("max_attempts must be >= 1"));
        }
        if !domain.is_valid() {
            return Err(GenError::invalid("domain box is empty"));
        }
        Ok(())
    }
}

/// Generate `params.count` rectangular fractures whose corners all lie in
/// the domain. Ids are assigned sequentially from zero.
pub fn generate_population(
    params: &FractureGenParams,
    domain: &Domain,
    src: &mut impl UniformSource,
) -> Result<Vec<Fracture>, GenError> {
    params.validate(domain)?;
    let mut out = Vec::with_capacity(params.count);
    for id in 0..params.count {
        out.push(generate_single(params, domain, id as u32, src)?);
    }
    Ok(out)
}

fn generate_single(
    params: &FractureGenParams,
    domain: &Domain,
    id: u32,
    src: &mut impl UniformSource,
) -> Result<Fracture, GenError> {
    for _ in 0..params.max_attempts {
        let center = domain.sample_point(src);
        let normal = sample_unit_normal(src);
        let (u_axis, v_axis) = plane_axes(normal, src.next_range(0.0, TAU));
        let half_a = 0.5 * src.next_range(params.side_min, params.side_max);
        let half_b = 0.5 * src.next_range(params.side_min, params.side_max);
        let corners = [
            center - u_axis * half_a - v_axis * half_b,
            center + u_axis * half_a - v_axis * half_b,
            center + u_axis * half_a + v_axis * half_b,
            center - u_axis * half_a + v_axis * half_b,
        ];
        if !corners.iter().all(|c| domain.contains(*c)) {
            continue;
        }
        return Fracture::from_corners(id, corners, params.aperture)
            .map_err(|e| GenError::degenerate(e.to_string()));
    }
    Err(GenError::degenerate(format!(
        "fracture {id}: no in-domain placement after {} attempts",
        params.max_attempts
    )))
}

/// Uniform direction on the unit sphere: z from [-1, 1), then the azimuth
/// from [0, tau).
fn sample_unit_normal(src: &mut impl UniformSource) -> Point3 {
    let z = src.next_range(-1.0, 1.0);
    let azimuth = src.next_range(0.0, TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Point3::new(r * azimuth.cos(), r * azimuth.sin(), z)
}

/// Orthonormal in-plane axes for `normal`, rotated by `angle` about it.
fn plane_axes(normal: Point3, angle: f64) -> (Point3, Point3) {
    // Seed with the global axis least aligned with the normal, so the
    // cross product never degenerates.
    let helper = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
        Point3::new(1.0, 0.0, 0.0)
    } else if normal.y.abs() <= normal.z.abs() {
        Point3::new(0.0, 1.0, 0.0)
    } else {
        Point3::new(0.0, 0.0, 1.0)
    };
    let u0 = normal.cross(&helper).normalize();
    let v0 = normal.cross(&u0);
    let (s, c) = angle.sin_cos();
    (u0 * c + v0 * s, v0 * c - u0 * s)
}

//! Scanline sampling of inter-fracture spacings.
//!
//! Purpose
//! - Lay synthetic horizontal sampling lines through the domain, intersect
//!   them with the fracture population, and derive the separation-distance
//!   array the calibration objective is built on.
//! - [`full_sample`] is the lines-times-fractures baseline;
//!   [`incremental_sample`] refreshes a single fracture's hits after a move
//!   and must reproduce the full pass exactly, which is what makes the
//!   optimizer's per-move cost acceptable.
//!
//! Draw order per sampling plane: orientation coin, then plane offset.

mod sample;

pub use sample::{full_sample, incremental_sample};

use crate::geom::Domain;
use crate::random::UniformSource;
use crate::Point3;

/// Which horizontal coordinate a scanline's plane holds constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixedAxis {
    X,
    Y,
}

impl FixedAxis {
    /// Coordinate index held constant.
    #[inline]
    pub fn fixed(self) -> usize {
        match self {
            FixedAxis::X => 0,
            FixedAxis::Y => 1,
        }
    }

    /// Coordinate index the line runs along.
    #[inline]
    pub fn varying(self) -> usize {
        match self {
            FixedAxis::X => 1,
            FixedAxis::Y => 0,
        }
    }
}

/// One scanline/fracture intersection record.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub point: Point3,
    pub fracture: u32,
}

/// A horizontal sampling line. Hit lists persist across optimizer moves
/// and are kept sorted along the varying coordinate.
#[derive(Clone, Debug)]
pub struct Scanline {
    pub a: Point3,
    pub b: Point3,
    pub axis: FixedAxis,
    pub hits: Vec<Hit>,
}

/// Generate `plane_count` sampling planes with `per_plane` scanlines each.
///
/// Per plane, one coin flip picks the orientation (`u < 0.5` holds x
/// constant, otherwise y) and one draw places the plane inside the domain.
/// Lines sit at bin-midpoint heights over the z-extent and span the domain
/// along the varying axis.
pub fn generate_scanlines(
    per_plane: usize,
    plane_count: usize,
    domain: &Domain,
    src: &mut impl UniformSource,
) -> Vec<Scanline> {
    let mut lines = Vec::with_capacity(per_plane * plane_count);
    let dz = domain.extent(2) / per_plane.max(1) as f64;
    for _ in 0..plane_count {
        let axis = if src.next_uniform() < 0.5 {
            FixedAxis::X
        } else {
            FixedAxis::Y
        };
        let fixed = axis.fixed();
        let varying = axis.varying();
        let offset = src.next_range(domain.min[fixed], domain.max[fixed]);
        for k in 0..per_plane {
            let z = domain.min.z + (k as f64 + 0.5) * dz;
            let mut a = Point3::zeros();
            let mut b = Point3::zeros();
            a[fixed] = offset;
            b[fixed] = offset;
            a[varying] = domain.min[varying];
            b[varying] = domain.max[varying];
            a.z = z;
            b.z = z;
            lines.push(Scanline {
                a,
                b,
                axis,
                hits: Vec::new(),
            });
        }
    }
    lines
}

//! Independent consistency check for a finished network.
//!
//! Re-derives edge membership through a different route than the sweep:
//! each source fracture's plane frame `[u v n]` is inverted with the
//! Gauss-Jordan solver and both edge endpoints are mapped into
//! fracture-local coordinates, where the out-of-plane component must vanish
//! and the in-plane part must fall inside the corner polygon (2D even-odd
//! test).

use std::fmt;

use nalgebra::Matrix3;

use super::types::Network;
use crate::geom::{gauss_jordan_invert, point_in_polygon_2d, Fracture, SolveError, Tol};
use crate::Point3;

/// Verification failures, with enough context to reproduce.
#[derive(Debug)]
pub enum VerifyError {
    UnknownFracture { edge: usize, fracture: u32 },
    DegenerateFrame { fracture: u32, source: SolveError },
    OffPlane { edge: usize, fracture: u32, offset: f64 },
    OutsideBoundary { edge: usize, fracture: u32 },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFracture { edge, fracture } => {
                write!(f, "edge {edge} references unknown fracture {fracture}")
            }
            Self::DegenerateFrame { fracture, source } => {
                write!(f, "fracture {fracture} has a degenerate plane frame: {source}")
            }
            Self::OffPlane { edge, fracture, offset } => write!(
                f,
                "edge {edge} endpoint leaves the plane of fracture {fracture} by {offset:.3e}"
            ),
            Self::OutsideBoundary { edge, fracture } => {
                write!(f, "edge {edge} endpoint falls outside fracture {fracture}")
            }
        }
    }
}

impl std::error::Error for VerifyError {}

/// Check every edge endpoint against both source fractures.
pub fn verify_network(net: &Network, fractures: &[Fracture], tol: &Tol) -> Result<(), VerifyError> {
    for (edge_idx, edge) in net.edges.iter().enumerate() {
        for id in [edge.fractures.0, edge.fractures.1] {
            let frac = fractures
                .iter()
                .find(|f| f.id == id)
                .ok_or(VerifyError::UnknownFracture {
                    edge: edge_idx,
                    fracture: id,
                })?;
            check_endpoint(edge_idx, edge.a, frac, tol)?;
            check_endpoint(edge_idx, edge.b, frac, tol)?;
        }
    }
    Ok(())
}

fn check_endpoint(edge_idx: usize, p: Point3, frac: &Fracture, tol: &Tol) -> Result<(), VerifyError> {
    let u = frac.corners[1] - frac.corners[0];
    let v = frac.corners[3] - frac.corners[0];
    let mut frame = Matrix3::from_columns(&[u, v, frac.normal]);
    let mut rhs: [Point3; 0] = [];
    gauss_jordan_invert(&mut frame, &mut rhs).map_err(|source| VerifyError::DegenerateFrame {
        fracture: frac.id,
        source,
    })?;

    let local = frame * (p - frac.corners[0]);
    let scale = frac.diagonals[0].max(frac.diagonals[1]).max(1.0);
    if local.z.abs() > tol.eps_point * scale {
        return Err(VerifyError::OffPlane {
            edge: edge_idx,
            fracture: frac.id,
            offset: local.z.abs(),
        });
    }

    // Corners in the same chart; the polygon lands in the local xy plane.
    let poly: Vec<Point3> = frac
        .corners
        .iter()
        .map(|c| frame * (c - frac.corners[0]))
        .collect();
    // Edge endpoints usually sit exactly on the boundary, where the
    // even-odd test is unstable. Nudge the query toward the polygon
    // centroid before classifying.
    let margin = tol.eps_point.max(1e-9);
    let cx = poly.iter().map(|c| c.x).sum::<f64>() / poly.len() as f64;
    let cy = poly.iter().map(|c| c.y).sum::<f64>() / poly.len() as f64;
    let qx = cx + (local.x - cx) * (1.0 - margin);
    let qy = cy + (local.y - cy) * (1.0 - margin);
    if !point_in_polygon_2d(&poly, qx, qy) {
        return Err(VerifyError::OutsideBoundary {
            edge: edge_idx,
            fracture: frac.id,
        });
    }
    Ok(())
}

//! Full and incremental sampling passes over the scanline set.

use super::{Hit, Scanline};
use crate::geom::{BoundingSphere, Fracture, Tol};
use crate::intersect::intersect_line_plane;

/// Re-test every fracture against every scanline, rebuild all hit lists,
/// and emit the aggregate separation-distance array.
pub fn full_sample(scanlines: &mut [Scanline], fractures: &[Fracture], tol: &Tol) -> Vec<f64> {
    for line in scanlines.iter_mut() {
        line.hits.clear();
        for frac in fractures {
            if let Some(hit) = test_fracture(line, frac, tol) {
                line.hits.push(hit);
            }
        }
        sort_hits(line);
    }
    gap_distances(scanlines)
}

/// Refresh only `fracture_id`'s hits after a move, then emit the aggregate
/// array. Produces exactly what [`full_sample`] would on the same
/// configuration, at the cost of one fracture instead of all of them.
pub fn incremental_sample(
    scanlines: &mut [Scanline],
    fractures: &[Fracture],
    fracture_id: u32,
    tol: &Tol,
) -> Vec<f64> {
    let moved = fractures.iter().find(|f| f.id == fracture_id);
    for line in scanlines.iter_mut() {
        line.hits.retain(|h| h.fracture != fracture_id);
        if let Some(frac) = moved {
            if let Some(hit) = test_fracture(line, frac, tol) {
                line.hits.push(hit);
                sort_hits(line);
            }
        }
    }
    gap_distances(scanlines)
}

/// Sphere prune, then the shared line/plane kernel.
fn test_fracture(line: &Scanline, frac: &Fracture, tol: &Tol) -> Option<Hit> {
    let sphere = BoundingSphere::of_fracture(frac);
    if sphere.distance_to_line(line.a, line.b) > 0.0 {
        return None;
    }
    intersect_line_plane(line.a, line.b, frac, tol).map(|point| Hit {
        point,
        fracture: frac.id,
    })
}

fn sort_hits(line: &mut Scanline) {
    let k = line.axis.varying();
    line.hits.sort_by(|p, q| p.point[k].total_cmp(&q.point[k]));
}

/// Euclidean distances between consecutive hits per line, concatenated in
/// line order.
fn gap_distances(scanlines: &[Scanline]) -> Vec<f64> {
    let mut out = Vec::new();
    for line in scanlines {
        for w in line.hits.windows(2) {
            out.push((w[1].point - w[0].point).norm());
        }
    }
    out
}

//! Per-pair intersection: prune, candidate solves, classification; plus the
//! line/plane and line/line kernels shared with scanline sampling.

use crate::geom::{
    point_in_quadrilateral_3d, point_on_segment, solve_cramer_3x3, BoundingSphere, Fracture, Tol,
};
use crate::Point3;

/// Classified result for one fracture pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PairIntersection {
    /// No shared geometry. Also the answer for every degenerate case:
    /// parallel or coplanar planes, grazes with a single accepted point,
    /// out-of-bounds candidates.
    None,
    /// The quadrilaterals touch at a single point (both accepted candidates
    /// within `eps_point` of each other).
    Touching(Point3),
    /// Proper intersection segment.
    Segment(Point3, Point3),
}

/// Intersect the line through `a`, `b` with the plane of `frac`, keeping
/// the hit only when it lies on the finite segment and inside the bounded
/// quadrilateral.
///
/// The plane is parameterized from corner 0 with the two adjacent edges as
/// spanning directions, so the solve is
/// `a + lambda d = c0 + s u + t v` with columns `[d, -u, -v]`.
pub fn intersect_line_plane(a: Point3, b: Point3, frac: &Fracture, tol: &Tol) -> Option<Point3> {
    let dir = b - a;
    let u = frac.corners[1] - frac.corners[0];
    let v = frac.corners[3] - frac.corners[0];
    let sol = solve_cramer_3x3([dir, -u, -v], frac.corners[0] - a, tol.eps_det)?;
    let p = a + dir * sol[0];
    if !point_on_segment(p, a, b, tol.eps_point) {
        return None;
    }
    if point_in_quadrilateral_3d(p, &frac.corners, frac.normal, tol.eps_point) > 3 {
        Some(p)
    } else {
        None
    }
}

/// Intersect two finite segments in 3D.
///
/// The two line parameters come from the first non-singular 2x2 row minor
/// of `[d0 | -d1]`, tried in the fixed order (0,1), (0,2), (1,2). The
/// candidate point must then lie on both segments; parallel or skew
/// segments answer `None`.
pub fn intersect_line_line(
    a0: Point3,
    b0: Point3,
    a1: Point3,
    b1: Point3,
    tol: &Tol,
) -> Option<Point3> {
    let d0 = b0 - a0;
    let d1 = b1 - a1;
    let rhs = a1 - a0;
    const ROWS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];
    for (r0, r1) in ROWS {
        let det = d0[r0] * (-d1[r1]) - (-d1[r0]) * d0[r1];
        if det.abs() < tol.eps_det {
            continue;
        }
        let lambda = (rhs[r0] * (-d1[r1]) - (-d1[r0]) * rhs[r1]) / det;
        let p = a0 + d0 * lambda;
        let hit = point_on_segment(p, a0, b0, tol.eps_point)
            && point_on_segment(p, a1, b1, tol.eps_point);
        return hit.then_some(p);
    }
    None
}

/// Classify the intersection between two fractures.
///
/// Far pairs are pruned on bounding spheres before any solver work. The
/// candidates are the 8 boundary edges tested against the other fracture's
/// plane; the search stops at two accepted points, and the edges of the
/// second fracture are only consulted when the first contributed fewer
/// than two.
pub fn intersect_pair(fi: &Fracture, fj: &Fracture, tol: &Tol) -> PairIntersection {
    let si = BoundingSphere::of_fracture(fi);
    let sj = BoundingSphere::of_fracture(fj);
    if !si.overlaps(&sj) {
        return PairIntersection::None;
    }

    let mut pts: Vec<Point3> = Vec::with_capacity(2);
    collect_edge_plane_hits(fi, fj, tol, &mut pts);
    if pts.len() < 2 {
        collect_edge_plane_hits(fj, fi, tol, &mut pts);
    }
    if pts.len() < 2 {
        return PairIntersection::None;
    }
    if (pts[1] - pts[0]).norm() <= tol.eps_point {
        PairIntersection::Touching(pts[0])
    } else {
        PairIntersection::Segment(pts[0], pts[1])
    }
}

fn collect_edge_plane_hits(edges_of: &Fracture, plane_of: &Fracture, tol: &Tol, out: &mut Vec<Point3>) {
    for k in 0..4 {
        if out.len() == 2 {
            return;
        }
        let (a, b) = edges_of.edge(k);
        if let Some(p) = intersect_line_plane(a, b, plane_of, tol) {
            out.push(p);
        }
    }
}

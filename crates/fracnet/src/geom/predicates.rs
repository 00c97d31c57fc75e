//! Tolerance-explicit point, segment, and polygon predicates.
//!
//! Degenerate or out-of-bounds inputs answer "no"; nothing in here errors.

use crate::Point3;

/// True iff `p` lies on the closed segment `a..b`: the two partial lengths
/// must sum to the segment length within `eps`.
#[inline]
pub fn point_on_segment(p: Point3, a: Point3, b: Point3, eps: f64) -> bool {
    let along = (a - p).norm() + (b - p).norm();
    (along - (b - a).norm()).abs() <= eps
}

/// Count of boundary edges whose sub-triangle `(p, c_k, c_{k+1})` keeps a
/// non-negative orientation against `normal`. A count above 3 means `p`
/// lies inside or on the boundary of the quadrilateral.
///
/// Precondition: `p` is coplanar with the corners and `normal` is the
/// normal derived from their order.
pub fn point_in_quadrilateral_3d(
    p: Point3,
    corners: &[Point3; 4],
    normal: Point3,
    eps: f64,
) -> u32 {
    let mut count = 0u32;
    for k in 0..4 {
        let u = corners[k] - p;
        let v = corners[(k + 1) % 4] - p;
        if u.cross(&v).dot(&normal) >= -eps {
            count += 1;
        }
    }
    count
}

/// Even-odd crossing test on the (x, y) projection of `polygon`.
///
/// Boundary points are not reliably classified; callers that care nudge
/// the query point off the boundary first.
pub fn point_in_polygon_2d(polygon: &[Point3], x: f64, y: f64) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);
        if (yi > y) != (yj > y) {
            let x_cross = xi + (y - yi) * (xj - xi) / (yj - yi);
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Perpendicular distance from `p` to the infinite line through `a`, `b`,
/// via the projection parameter `lambda = (p - a)·(b - a) / |b - a|^2`.
/// A degenerate line (`a == b`) falls back to the point distance.
pub fn distance_point_to_line(a: Point3, b: Point3, p: Point3) -> f64 {
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let lambda = (p - a).dot(&d) / len2;
    (p - (a + d * lambda)).norm()
}

/// Parallel test on direction vectors: take the scale ratio at the
/// largest-magnitude component of `d0` and require every component of `d1`
/// to match `ratio * d0` within `eps`. Returns the ratio for reuse.
///
/// A zero `d0` counts as parallel (with ratio 0), which downstream means
/// "no usable crossing".
pub fn lines_parallel(d0: Point3, d1: Point3, eps: f64) -> (bool, f64) {
    let mut k = 0;
    for i in 1..3 {
        if d0[i].abs() > d0[k].abs() {
            k = i;
        }
    }
    if d0[k].abs() == 0.0 {
        return (true, 0.0);
    }
    let ratio = d1[k] / d0[k];
    let parallel = (0..3).all(|i| (d1[i] - ratio * d0[i]).abs() <= eps);
    (parallel, ratio)
}

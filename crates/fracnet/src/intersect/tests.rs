//! Pair classification, sweep, and verification tests on analytic
//! fixtures.

use proptest::prelude::*;

use super::*;
use crate::geom::{Fracture, Tol};
use crate::Point3;

fn quad(id: u32, corners: [[f64; 3]; 4]) -> Fracture {
    let pts = corners.map(|c| Point3::new(c[0], c[1], c[2]));
    Fracture::from_corners(id, pts, 1e-4).expect("planar fixture")
}

/// Unit square in the z = 0 plane.
fn square_z0(id: u32) -> Fracture {
    quad(
        id,
        [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
    )
}

/// Unit square in the y = 0 plane, sharing the x-axis edge with
/// `square_z0`.
fn square_y0(id: u32) -> Fracture {
    quad(
        id,
        [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ],
    )
}

fn same_pair(a: Point3, b: Point3, p: Point3, q: Point3) -> bool {
    let eps = 1e-9;
    ((a - p).norm() < eps && (b - q).norm() < eps)
        || ((a - q).norm() < eps && (b - p).norm() < eps)
}

#[test]
fn line_plane_hit_inside_quad() {
    let f = square_z0(0);
    let tol = Tol::default();
    let p = intersect_line_plane(
        Point3::new(0.5, 0.5, -1.0),
        Point3::new(0.5, 0.5, 1.0),
        &f,
        &tol,
    )
    .expect("pierces the square");
    assert!((p - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);
}

#[test]
fn line_plane_miss_outside_quad() {
    let f = square_z0(0);
    let tol = Tol::default();
    // crosses the plane but outside the boundary
    assert!(intersect_line_plane(
        Point3::new(2.0, 2.0, -1.0),
        Point3::new(2.0, 2.0, 1.0),
        &f,
        &tol
    )
    .is_none());
    // segment ends before reaching the plane
    assert!(intersect_line_plane(
        Point3::new(0.5, 0.5, 2.0),
        Point3::new(0.5, 0.5, 1.0),
        &f,
        &tol
    )
    .is_none());
    // direction lies in the plane: singular solve
    assert!(intersect_line_plane(
        Point3::new(-1.0, 0.5, 0.0),
        Point3::new(2.0, 0.5, 0.0),
        &f,
        &tol
    )
    .is_none());
}

#[test]
fn line_line_crossing_and_rejections() {
    let tol = Tol::default();
    let p = intersect_line_line(
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        &tol,
    )
    .expect("crossing segments");
    assert!(p.norm() < 1e-12);

    // crossing point beyond the first segment's end
    assert!(intersect_line_line(
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(-0.5, 0.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        &tol,
    )
    .is_none());

    // parallel segments: every minor is singular
    assert!(intersect_line_line(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        &tol,
    )
    .is_none());

    // clearly skew segments
    assert!(intersect_line_line(
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, -1.0, 0.5),
        Point3::new(0.0, 1.0, 0.5),
        &tol,
    )
    .is_none());

    // touching exactly at an endpoint
    let t = intersect_line_line(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        &tol,
    )
    .expect("endpoint touch");
    assert!((t - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
}

#[test]
fn far_pair_is_pruned() {
    let a = square_z0(0);
    let mut b = square_z0(1);
    b.translate(Point3::new(10.0, 0.0, 0.0));
    assert_eq!(intersect_pair(&a, &b, &Tol::default()), PairIntersection::None);
}

#[test]
fn shared_edge_pair_yields_exact_segment() {
    let a = square_z0(0);
    let b = square_y0(1);
    match intersect_pair(&a, &b, &Tol::default()) {
        PairIntersection::Segment(p, q) => {
            assert!(same_pair(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                p,
                q
            ));
        }
        other => panic!("expected a segment, got {other:?}"),
    }
}

#[test]
fn coplanar_pairs_take_the_parallel_branch() {
    let a = square_z0(0);
    let mut b = square_z0(1);
    b.translate(Point3::new(0.5, 0.0, 0.0));
    // overlapping but coplanar: every edge/plane solve is singular
    assert_eq!(intersect_pair(&a, &b, &Tol::default()), PairIntersection::None);

    let mut c = square_z0(2);
    c.translate(Point3::new(0.0, 0.0, 0.5));
    // parallel planes at distance 0.5
    assert_eq!(intersect_pair(&a, &c, &Tol::default()), PairIntersection::None);
}

#[test]
fn corner_touch_classifies_as_touching() {
    let a = square_z0(0);
    let b = quad(
        1,
        [
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
        ],
    );
    match intersect_pair(&a, &b, &Tol::default()) {
        PairIntersection::Touching(p) => {
            assert!((p - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
        }
        other => panic!("expected touching, got {other:?}"),
    }
}

#[test]
fn sweep_records_shared_edge_once() {
    let fractures = [square_z0(0), square_y0(1)];
    let net = sweep(&fractures, &Tol::default());
    assert_eq!(net.edges.len(), 1);
    assert!(net.vertices.is_empty());
    assert_eq!(net.edges[0].fractures, (0, 1));
    assert!(same_pair(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        net.edges[0].a,
        net.edges[0].b
    ));
}

#[test]
fn sweep_of_separated_fractures_is_empty() {
    let mut fractures = vec![square_z0(0), square_z0(1), square_z0(2)];
    fractures[1].translate(Point3::new(5.0, 0.0, 0.0));
    fractures[2].translate(Point3::new(0.0, 5.0, 0.0));
    let net = sweep(&fractures, &Tol::default());
    assert!(net.edges.is_empty());
    assert!(net.vertices.is_empty());
}

#[test]
fn crossing_segments_become_one_vertex() {
    // Horizontal square cut by two vertical squares whose intersection
    // segments cross at (0.5, 0.5, 0); the third pair adds a segment
    // through the same point.
    let floor = square_z0(0);
    let wall_y = quad(
        1,
        [
            [0.0, 0.5, -0.5],
            [1.0, 0.5, -0.5],
            [1.0, 0.5, 0.5],
            [0.0, 0.5, 0.5],
        ],
    );
    let wall_x = quad(
        2,
        [
            [0.5, 0.0, -0.5],
            [0.5, 1.0, -0.5],
            [0.5, 1.0, 0.5],
            [0.5, 0.0, 0.5],
        ],
    );
    let net = sweep(&[floor, wall_y, wall_x], &Tol::default());
    assert_eq!(net.edges.len(), 3);
    assert_eq!(net.vertices.len(), 1);
    assert!((net.vertices[0].point - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-9);
}

#[test]
fn vertex_dedup_scans_the_full_list() {
    let mut net = Network::new();
    let p0 = Point3::new(0.0, 0.0, 0.0);
    let p1 = Point3::new(1.0, 0.0, 0.0);
    assert_eq!(net.push_vertex(p0, 1e-6), VertexOutcome::Inserted(0));
    assert_eq!(net.push_vertex(p1, 1e-6), VertexOutcome::Inserted(1));
    // an earlier point, re-offered after another insertion in between
    assert_eq!(net.push_vertex(p0, 1e-6), VertexOutcome::Duplicate(0));
    assert_eq!(
        net.push_vertex(Point3::new(1.0, 1e-9, 0.0), 1e-6),
        VertexOutcome::Duplicate(1)
    );
    assert_eq!(net.vertices.len(), 2);
}

#[test]
fn verify_accepts_sweep_output() {
    let fractures = [square_z0(0), square_y0(1)];
    let net = sweep(&fractures, &Tol::default());
    verify_network(&net, &fractures, &Tol::default()).expect("consistent network");
}

#[test]
fn verify_flags_corrupted_edges() {
    let fractures = [square_z0(0), square_y0(1)];
    let tol = Tol::default();
    let mut net = sweep(&fractures, &tol);

    let mut off_plane = net.clone();
    off_plane.edges[0].a.z += 0.1;
    assert!(matches!(
        verify_network(&off_plane, &fractures, &tol),
        Err(VerifyError::OffPlane { .. })
    ));

    net.edges[0].fractures = (0, 9);
    assert!(matches!(
        verify_network(&net, &fractures, &tol),
        Err(VerifyError::UnknownFracture { fracture: 9, .. })
    ));
}

#[test]
fn verify_flags_out_of_boundary_endpoint() {
    let fractures = [square_z0(0), square_y0(1)];
    let tol = Tol::default();
    let mut net = sweep(&fractures, &tol);
    // slide the endpoint along the shared line, past both boundaries
    net.edges[0].a = Point3::new(3.0, 0.0, 0.0);
    net.edges[0].b = Point3::new(4.0, 0.0, 0.0);
    assert!(matches!(
        verify_network(&net, &fractures, &tol),
        Err(VerifyError::OutsideBoundary { .. })
    ));
}

fn grid_xy() -> impl Strategy<Value = (f64, f64)> {
    (-8i32..=8, -8i32..=8).prop_map(|(x, y)| (x as f64 / 8.0, y as f64 / 8.0))
}

proptest! {
    // Segments on one or two z-levels: a shared level exercises crossing,
    // parallel, collinear, and degenerate cases on exact grid coordinates;
    // distinct levels give robustly disjoint segments. Both argument
    // orders must agree.
    #[test]
    fn line_line_is_symmetric(
        a in grid_xy(),
        b in grid_xy(),
        c in grid_xy(),
        d in grid_xy(),
        z0 in prop::sample::select(vec![0.0f64, 1.0]),
        z1 in prop::sample::select(vec![0.0f64, 1.0]),
    ) {
        let tol = Tol::default();
        let a = Point3::new(a.0, a.1, z0);
        let b = Point3::new(b.0, b.1, z0);
        let c = Point3::new(c.0, c.1, z1);
        let d = Point3::new(d.0, d.1, z1);
        let fwd = intersect_line_line(a, b, c, d, &tol);
        let rev = intersect_line_line(c, d, a, b, &tol);
        match (fwd, rev) {
            (Some(p), Some(q)) => prop_assert!((p - q).norm() < 1e-9),
            (None, None) => {}
            (p, q) => prop_assert!(false, "asymmetric outcome: {p:?} vs {q:?}"),
        }
    }
}

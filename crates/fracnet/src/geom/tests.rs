//! Predicate, solver, and type tests on hand-checkable configurations.

use nalgebra::Matrix3;

use super::*;
use crate::random::ScriptedUniform;
use crate::Point3;

fn unit_square_z0() -> [Point3; 4] {
    [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]
}

#[test]
fn cramer_solves_well_conditioned_system() {
    // x + y = 3, y + z = 5, x + z = 4  =>  (1, 2, 3)
    let cols = [
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let rhs = Point3::new(3.0, 5.0, 4.0);
    let x = solve_cramer_3x3(cols, rhs, 1e-9).expect("non-singular");
    assert!((x - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-12);
}

#[test]
fn cramer_rejects_singular_columns() {
    let c = Point3::new(1.0, 2.0, 3.0);
    let cols = [c, c * 2.0, Point3::new(0.0, 0.0, 1.0)];
    assert!(solve_cramer_3x3(cols, Point3::zeros(), 1e-9).is_none());
}

#[test]
fn gauss_jordan_inverts_and_solves() {
    let m = Matrix3::new(2.0, 0.0, 1.0, 0.0, 3.0, 0.0, 1.0, 0.0, 1.0);
    let b0 = Point3::new(1.0, 0.0, 0.0);
    let b1 = Point3::new(0.0, 1.0, 1.0);
    let mut a = m;
    let mut rhs = [b0, b1];
    gauss_jordan_invert(&mut a, &mut rhs).expect("invertible");
    assert!((m * a - Matrix3::identity()).amax() < 1e-12);
    assert!((m * rhs[0] - b0).norm() < 1e-12);
    assert!((m * rhs[1] - b1).norm() < 1e-12);
}

#[test]
fn gauss_jordan_reports_singular_matrix() {
    let mut a = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
    let mut rhs: [Point3; 0] = [];
    assert!(matches!(
        gauss_jordan_invert(&mut a, &mut rhs),
        Err(SolveError::SingularMatrix)
    ));
}

#[test]
fn segment_membership_uses_length_sum() {
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(2.0, 0.0, 0.0);
    assert!(point_on_segment(Point3::new(1.0, 0.0, 0.0), a, b, 1e-6));
    assert!(point_on_segment(a, a, b, 1e-6));
    assert!(point_on_segment(b, a, b, 1e-6));
    assert!(!point_on_segment(Point3::new(3.0, 0.0, 0.0), a, b, 1e-6));
    assert!(!point_on_segment(Point3::new(1.0, 0.1, 0.0), a, b, 1e-6));
}

#[test]
fn quadrilateral_membership_counts_all_four_edges() {
    let q = unit_square_z0();
    let n = Point3::new(0.0, 0.0, 1.0);
    assert_eq!(
        point_in_quadrilateral_3d(Point3::new(0.5, 0.5, 0.0), &q, n, 1e-6),
        4
    );
    // boundary and corner points still pass all four edge checks
    assert_eq!(
        point_in_quadrilateral_3d(Point3::new(1.0, 0.5, 0.0), &q, n, 1e-6),
        4
    );
    assert_eq!(
        point_in_quadrilateral_3d(Point3::new(0.0, 0.0, 0.0), &q, n, 1e-6),
        4
    );
    assert!(point_in_quadrilateral_3d(Point3::new(1.5, 0.5, 0.0), &q, n, 1e-6) <= 3);
    assert!(point_in_quadrilateral_3d(Point3::new(-0.1, -0.1, 0.0), &q, n, 1e-6) <= 3);
}

#[test]
fn polygon_2d_even_odd_classification() {
    let q = unit_square_z0();
    assert!(point_in_polygon_2d(&q, 0.5, 0.5));
    assert!(!point_in_polygon_2d(&q, 1.5, 0.5));
    assert!(!point_in_polygon_2d(&q, -0.5, 0.25));
    assert!(!point_in_polygon_2d(&q[..2], 0.5, 0.5));
}

#[test]
fn point_line_distance_via_projection() {
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(1.0, 0.0, 0.0);
    let d = distance_point_to_line(a, b, Point3::new(0.3, 2.0, 0.0));
    assert!((d - 2.0).abs() < 1e-12);
    // the projection extends past the segment end
    let d2 = distance_point_to_line(a, b, Point3::new(5.0, 1.0, 0.0));
    assert!((d2 - 1.0).abs() < 1e-12);
    // degenerate line
    let d3 = distance_point_to_line(a, a, Point3::new(0.0, 3.0, 4.0));
    assert!((d3 - 5.0).abs() < 1e-12);
}

#[test]
fn parallel_test_returns_scale_ratio() {
    let (par, ratio) = lines_parallel(
        Point3::new(1.0, 2.0, -1.0),
        Point3::new(-2.0, -4.0, 2.0),
        1e-6,
    );
    assert!(par);
    assert!((ratio + 2.0).abs() < 1e-12);

    let (par2, _) = lines_parallel(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 0.5, 0.0), 1e-6);
    assert!(!par2);

    let (par3, ratio3) = lines_parallel(Point3::zeros(), Point3::new(1.0, 0.0, 0.0), 1e-6);
    assert!(par3);
    assert_eq!(ratio3, 0.0);
}

#[test]
fn fracture_derives_normal_lengths_diagonals() {
    let f = Fracture::from_corners(7, unit_square_z0(), 1e-4).expect("planar");
    assert_eq!(f.id, 7);
    assert!((f.normal - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    assert!((f.lengths[0] - 1.0).abs() < 1e-12);
    assert!((f.lengths[1] - 1.0).abs() < 1e-12);
    assert!((f.diagonals[0] - 2f64.sqrt()).abs() < 1e-12);
    assert!((f.center() - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);
}

#[test]
fn fracture_rejects_non_planar_corners() {
    let mut q = unit_square_z0();
    q[2].z = 0.5;
    assert!(matches!(
        Fracture::from_corners(0, q, 0.0),
        Err(FractureError::NotPlanar { .. })
    ));
}

#[test]
fn fracture_rejects_collapsed_corners() {
    let p = Point3::new(1.0, 1.0, 1.0);
    assert!(matches!(
        Fracture::from_corners(0, [p, p, p, p], 0.0),
        Err(FractureError::DegenerateCorners { .. })
    ));
}

#[test]
fn translation_moves_corners_rigidly() {
    let mut f = Fracture::from_corners(0, unit_square_z0(), 0.0).expect("planar");
    f.translate_to_center(Point3::new(3.0, 3.0, 3.0));
    assert!((f.center() - Point3::new(3.0, 3.0, 3.0)).norm() < 1e-12);
    assert!((f.lengths[0] - 1.0).abs() < 1e-12);
    assert!((f.normal - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    assert!(((f.corners[1] - f.corners[0]).norm() - 1.0).abs() < 1e-12);
}

#[test]
fn bounding_sphere_covers_all_corners() {
    let f = Fracture::from_corners(0, unit_square_z0(), 0.0).expect("planar");
    let s = BoundingSphere::of_fracture(&f);
    assert!((s.center - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);
    for c in &f.corners {
        assert!((c - s.center).norm() <= s.radius + 1e-12);
    }
    assert!(s.overlaps(&s));
    let far = BoundingSphere {
        center: Point3::new(10.0, 0.0, 0.0),
        radius: 1.0,
    };
    assert!(!s.overlaps(&far));
}

#[test]
fn sphere_line_distance_prunes_misses_only() {
    let f = Fracture::from_corners(0, unit_square_z0(), 0.0).expect("planar");
    let s = BoundingSphere::of_fracture(&f);
    let miss = s.distance_to_line(Point3::new(0.0, 0.5, 5.0), Point3::new(1.0, 0.5, 5.0));
    assert!(miss > 3.0);
    let hit = s.distance_to_line(Point3::new(0.5, -1.0, 0.0), Point3::new(0.5, 2.0, 0.0));
    assert_eq!(hit, 0.0);
}

#[test]
fn domain_sampling_consumes_three_draws_in_order() {
    let dom = Domain::new(Point3::zeros(), Point3::new(2.0, 4.0, 8.0));
    assert!(dom.is_valid());
    let mut src = ScriptedUniform::new(vec![0.5, 0.25, 0.125]);
    let p = dom.sample_point(&mut src);
    assert!((p - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-12);
    assert!(dom.contains(p));
    assert!(!dom.contains(Point3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn inverted_domain_is_invalid() {
    let dom = Domain::new(Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0));
    assert!(!dom.is_valid());
}

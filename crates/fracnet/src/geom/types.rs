//! Fracture, domain, and bounding-sphere types plus the tolerance set.

use std::fmt;

use crate::random::UniformSource;
use crate::Point3;

use super::predicates::distance_point_to_line;

/// Relative out-of-plane slack allowed for the fourth corner.
const PLANAR_EPS: f64 = 1e-9;

/// Consolidated tolerances for the whole pipeline.
#[derive(Clone, Copy, Debug)]
pub struct Tol {
    /// Point identity and segment-membership slack (length units).
    pub eps_point: f64,
    /// Determinant magnitude below which a Cramer solve is singular.
    pub eps_det: f64,
    /// Component-ratio slack for the parallel-direction test.
    pub eps_parallel: f64,
}

impl Default for Tol {
    fn default() -> Self {
        Self {
            eps_point: 1e-6,
            eps_det: 1e-9,
            eps_parallel: 1e-6,
        }
    }
}

/// Construction failures for [`Fracture::from_corners`].
#[derive(Debug)]
pub enum FractureError {
    NotPlanar { id: u32, offset: f64 },
    DegenerateCorners { id: u32 },
}

impl fmt::Display for FractureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPlanar { id, offset } => write!(
                f,
                "fracture {id}: corners deviate from a common plane by {offset:.3e}"
            ),
            Self::DegenerateCorners { id } => {
                write!(f, "fracture {id}: corners do not span a proper quadrilateral")
            }
        }
    }
}

impl std::error::Error for FractureError {}

/// A planar quadrilateral fracture element.
///
/// Corners are ordered so consecutive entries (mod 4) form the boundary
/// edges. Orientation, side lengths, diagonals, and aperture are frozen at
/// construction; calibration only translates the element rigidly, so the
/// derived fields stay valid.
#[derive(Clone, Debug)]
pub struct Fracture {
    pub id: u32,
    pub corners: [Point3; 4],
    /// Unit plane normal, from the corner order.
    pub normal: Point3,
    /// Side lengths of the two edges leaving corner 0.
    pub lengths: [f64; 2],
    /// Diagonals 0-2 and 1-3.
    pub diagonals: [f64; 2],
    pub aperture: f64,
}

impl Fracture {
    /// Build from ordered corners; derives the normal, side lengths, and
    /// diagonals, and rejects non-planar or collapsed corner sets.
    pub fn from_corners(
        id: u32,
        corners: [Point3; 4],
        aperture: f64,
    ) -> Result<Self, FractureError> {
        let e0 = corners[1] - corners[0];
        let e1 = corners[3] - corners[0];
        let cross = e0.cross(&e1);
        let cross_norm = cross.norm();
        if e0.norm() == 0.0 || e1.norm() == 0.0 || cross_norm < 1e-12 * e0.norm() * e1.norm() {
            return Err(FractureError::DegenerateCorners { id });
        }
        let normal = cross / cross_norm;
        let diagonals = [
            (corners[2] - corners[0]).norm(),
            (corners[3] - corners[1]).norm(),
        ];
        let offset = (corners[2] - corners[0]).dot(&normal).abs();
        if offset > PLANAR_EPS * diagonals[0].max(diagonals[1]).max(1.0) {
            return Err(FractureError::NotPlanar { id, offset });
        }
        Ok(Self {
            id,
            corners,
            normal,
            lengths: [e0.norm(), e1.norm()],
            diagonals,
            aperture,
        })
    }

    /// Corner average.
    pub fn center(&self) -> Point3 {
        (self.corners[0] + self.corners[1] + self.corners[2] + self.corners[3]) / 4.0
    }

    /// Rigid translation by `delta`.
    pub fn translate(&mut self, delta: Point3) {
        for c in &mut self.corners {
            *c += delta;
        }
    }

    /// Rigid translation placing the corner average at `center`.
    pub fn translate_to_center(&mut self, center: Point3) {
        let delta = center - self.center();
        self.translate(delta);
    }

    /// Boundary edge `k`: corners `k` and `k + 1` (mod 4).
    #[inline]
    pub fn edge(&self, k: usize) -> (Point3, Point3) {
        (self.corners[k], self.corners[(k + 1) % 4])
    }
}

/// Bounding sphere of a fracture: centered at the longer diagonal's
/// midpoint with half that diagonal as radius, inflated until every corner
/// is covered.
#[derive(Clone, Copy, Debug)]
pub struct BoundingSphere {
    pub center: Point3,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn of_fracture(f: &Fracture) -> Self {
        let (a, b) = if f.diagonals[0] >= f.diagonals[1] {
            (f.corners[0], f.corners[2])
        } else {
            (f.corners[1], f.corners[3])
        };
        let center = (a + b) * 0.5;
        let mut radius = (b - a).norm() * 0.5;
        for c in &f.corners {
            radius = radius.max((c - center).norm());
        }
        Self { center, radius }
    }

    /// Conservative pair prune: spheres at least touch.
    #[inline]
    pub fn overlaps(&self, other: &BoundingSphere) -> bool {
        self.radius + other.radius >= (self.center - other.center).norm()
    }

    /// Distance from the sphere surface to the infinite line through `a`
    /// and `b`; zero when the line pierces the sphere.
    pub fn distance_to_line(&self, a: Point3, b: Point3) -> f64 {
        (distance_point_to_line(a, b, self.center) - self.radius).max(0.0)
    }
}

/// Axis-aligned generation box.
#[derive(Clone, Copy, Debug)]
pub struct Domain {
    pub min: Point3,
    pub max: Point3,
}

impl Domain {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// True when `max` strictly dominates `min` in every coordinate.
    pub fn is_valid(&self) -> bool {
        (0..3).all(|k| self.max[k] > self.min[k])
    }

    pub fn contains(&self, p: Point3) -> bool {
        (0..3).all(|k| p[k] >= self.min[k] && p[k] <= self.max[k])
    }

    /// Extent along coordinate `k`.
    #[inline]
    pub fn extent(&self, k: usize) -> f64 {
        self.max[k] - self.min[k]
    }

    /// Uniform point inside the box. Consumes three draws: x, then y,
    /// then z.
    pub fn sample_point(&self, src: &mut impl UniformSource) -> Point3 {
        let x = src.next_range(self.min.x, self.max.x);
        let y = src.next_range(self.min.y, self.max.y);
        let z = src.next_range(self.min.z, self.max.z);
        Point3::new(x, y, z)
    }
}

//! Small dense solvers behind every intersection routine.
//!
//! `solve_cramer_3x3` answers the 3-parameter line/plane systems where a
//! singular matrix is an expected geometric outcome (parallel, coplanar)
//! and therefore comes back as `None`. `gauss_jordan_invert` inverts plane
//! frames for the membership verification; there a vanishing pivot means a
//! corrupt frame and surfaces as an error.

use std::fmt;

use nalgebra::Matrix3;

use crate::Point3;

/// Hard solver failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    SingularMatrix,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingularMatrix => write!(f, "singular matrix in gauss-jordan elimination"),
        }
    }
}

impl std::error::Error for SolveError {}

/// Solve `A x = rhs` by Cramer's rule, with `A` given column-wise.
///
/// Returns `None` when `|det A| < eps_det`; callers treat that as "no
/// intersection", not as a fault.
pub fn solve_cramer_3x3(cols: [Point3; 3], rhs: Point3, eps_det: f64) -> Option<Point3> {
    let a = Matrix3::from_columns(&cols);
    let det = a.determinant();
    if det.abs() < eps_det {
        return None;
    }
    let mut x = Point3::zeros();
    for k in 0..3 {
        let mut ak = a;
        ak.set_column(k, &rhs);
        x[k] = ak.determinant() / det;
    }
    Some(x)
}

/// Invert `a` in place by full-pivoting Gauss-Jordan elimination, applying
/// the same row operations to every right-hand side in `rhs`.
///
/// On success `a` holds its own inverse and each `rhs[k]` holds the
/// solution of the original system. The pivot search runs over the whole
/// unreduced block, so only an exactly rank-deficient matrix fails.
pub fn gauss_jordan_invert(a: &mut Matrix3<f64>, rhs: &mut [Point3]) -> Result<(), SolveError> {
    const N: usize = 3;
    let mut pivoted = [false; N];
    let mut index_row = [0usize; N];
    let mut index_col = [0usize; N];

    for pass in 0..N {
        let mut pivot = 0.0f64;
        let mut prow = 0;
        let mut pcol = 0;
        for r in 0..N {
            if pivoted[r] {
                continue;
            }
            for c in 0..N {
                if !pivoted[c] && a[(r, c)].abs() > pivot {
                    pivot = a[(r, c)].abs();
                    prow = r;
                    pcol = c;
                }
            }
        }
        if pivot == 0.0 {
            return Err(SolveError::SingularMatrix);
        }
        pivoted[pcol] = true;

        if prow != pcol {
            a.swap_rows(prow, pcol);
            for b in rhs.iter_mut() {
                b.swap_rows(prow, pcol);
            }
        }
        index_row[pass] = prow;
        index_col[pass] = pcol;

        let inv_pivot = 1.0 / a[(pcol, pcol)];
        a[(pcol, pcol)] = 1.0;
        for c in 0..N {
            a[(pcol, c)] *= inv_pivot;
        }
        for b in rhs.iter_mut() {
            b[pcol] *= inv_pivot;
        }

        for r in 0..N {
            if r == pcol {
                continue;
            }
            let factor = a[(r, pcol)];
            if factor == 0.0 {
                continue;
            }
            a[(r, pcol)] = 0.0;
            for c in 0..N {
                let delta = factor * a[(pcol, c)];
                a[(r, c)] -= delta;
            }
            for b in rhs.iter_mut() {
                let delta = factor * b[pcol];
                b[r] -= delta;
            }
        }
    }

    // Undo the column permutation implied by the row swaps.
    for pass in (0..N).rev() {
        if index_row[pass] != index_col[pass] {
            a.swap_columns(index_row[pass], index_col[pass]);
        }
    }
    Ok(())
}

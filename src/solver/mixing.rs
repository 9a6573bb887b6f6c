//! Least-squares mixing step for Anderson acceleration, via Faer.
//!
//! Each iteration solves `min ‖ΔF'·β − f‖₂` over the populated history
//! columns with a column-pivoted QR factorization. Pivoting keeps the solve
//! well-behaved when the recorded residual deltas are nearly dependent, which
//! is common once the iteration stalls along a few directions.

use crate::solver::history::DeltaHistory;
use faer::Mat;
use faer::linalg::solvers::ColPivQr;
use faer::prelude::SolveLstsq;
use faer::traits::ComplexField;
use num_traits::Float;

/// Workspace for the per-iteration mixing solve.
///
/// `beta` is overwritten on every call; it never carries state between
/// iterations.
pub struct MixingWorkspace<T> {
    beta: Vec<T>,
    /// Coefficients beyond this magnitude signal a numerically rank-deficient
    /// history.
    coeff_cap: T,
}

impl<T: ComplexField + Float> MixingWorkspace<T> {
    pub fn new(depth: usize) -> Self {
        Self {
            beta: vec![T::zero(); depth],
            coeff_cap: num_traits::cast::<f64, T>(1e8).unwrap(),
        }
    }

    /// Mixing coefficients β minimizing `‖ΔF'·β − f‖₂` over the populated
    /// history columns.
    ///
    /// Requires at least one recorded pair. Column pivoting absorbs
    /// rank-deficient history; when the triangular factor still yields
    /// non-finite or oversized coefficients (exactly collinear deltas can zero
    /// a pivot), the whole vector is zeroed so the caller degrades to the
    /// plain unmixed update for this iteration.
    pub fn coefficients(&mut self, f: &[T], history: &DeltaHistory<T>) -> &[T] {
        let p = history.pairs();
        let n = f.len();
        let rhs = Mat::from_fn(n, 1, |i, _| f[i]);
        let qr = ColPivQr::new(history.residual_deltas().submatrix(0, 0, n, p));
        let sol = qr.solve_lstsq(rhs);
        let usable = (0..p).all(|j| {
            let bj = sol[(j, 0)];
            Float::is_finite(bj) && Float::abs(bj) <= self.coeff_cap
        });
        for j in 0..p {
            self.beta[j] = if usable { sol[(j, 0)] } else { T::zero() };
        }
        &self.beta[..p]
    }
}

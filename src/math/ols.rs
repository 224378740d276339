//! Ordinary least squares solver.
//!
//! In this project we repeatedly solve small linear regression problems:
//! one per candidate degree per fold, across hundreds of combinations.
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns) or rank-deficient.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - Underdetermined systems (degree + 1 > rows) are not rejected here;
//!   SVD returns the minimum-norm solution. Cross-validation callers guard
//!   against such degrees because a perfect in-sample fit defeats the
//!   search.
//! - Parameter dimension is tiny (at most ~15 columns), so SVD performance
//!   is a non-issue.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_handles_rank_deficiency() {
        // Two identical columns: infinitely many solutions; SVD picks the
        // minimum-norm one and must stay finite.
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!(beta.iter().all(|v| v.is_finite()));
        // Fitted values still reproduce y.
        let fit = &x * &beta;
        for (a, b) in fit.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-8);
        }
    }
}

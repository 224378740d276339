//! Low-level fitting of a single polynomial degree.
//!
//! Given training and (possibly empty) validation sequences, we:
//! - derive the x normalization from the training inputs
//! - expand each x into the power basis of the requested degree
//! - solve ordinary least squares for the coefficients
//! - score the fit with R² on both sets
//!
//! The validation score is `None` when the validation set is empty; a real
//! score of 0.0 must stay distinguishable from "no validation data".
//!
//! Deliberately *not* checked here: `degree + 1 > x_train.len()`. An
//! underdetermined system still solves (minimum-norm SVD solution) and
//! produces a perfect in-sample fit; it is the cross-validation caller's job
//! to exclude such degrees from the search.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::math::{normalize_x, power_row, r_squared, solve_least_squares, x_norm_for};
use crate::models::PolyModel;

/// Outcome of fitting one degree on one train/validation split.
#[derive(Debug, Clone)]
pub struct PolyFit {
    pub model: PolyModel,
    pub train_score: f64,
    /// R² on the validation set; `None` when the validation set is empty.
    pub val_score: Option<f64>,
}

/// Fit a polynomial of the given degree by ordinary least squares.
pub fn fit_polynomial(
    x_train: &[f64],
    y_train: &[f64],
    x_val: &[f64],
    y_val: &[f64],
    degree: usize,
) -> Result<PolyFit, AppError> {
    if x_train.is_empty() {
        return Err(AppError::new(3, "No training points to fit."));
    }
    if x_train.len() != y_train.len() || x_val.len() != y_val.len() {
        return Err(AppError::new(4, "Train/validation sequences are not parallel."));
    }
    if degree == 0 {
        return Err(AppError::new(2, "Polynomial degree must be >= 1."));
    }

    let n = x_train.len();
    let p = degree + 1;
    let (x_offset, x_scale) = x_norm_for(x_train);

    let mut design = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for (i, &x) in x_train.iter().enumerate() {
        let u = normalize_x(x, x_offset, x_scale);
        power_row(u, degree, &mut row);
        for (j, &v) in row.iter().enumerate() {
            design[(i, j)] = v;
        }
    }
    let y = DVector::from_column_slice(y_train);

    let beta = solve_least_squares(&design, &y).ok_or_else(|| {
        AppError::new(4, format!("Least-squares solve failed for degree {degree}."))
    })?;

    let model = PolyModel {
        degree,
        coeffs: beta.iter().copied().collect(),
        x_offset,
        x_scale,
    };

    let train_pred = model.predict_many(x_train);
    let train_score = r_squared(y_train, &train_pred);

    let val_score = if y_val.is_empty() {
        None
    } else {
        let val_pred = model.predict_many(x_val);
        Some(r_squared(y_val, &val_pred))
    };

    Ok(PolyFit {
        model,
        train_score,
        val_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_fits_perfectly() {
        let x: Vec<f64> = (2000..=2020).map(|y| y as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| 3.0 * v - 6000.0).collect();

        let fit = fit_polynomial(&x, &y, &[], &[], 1).unwrap();
        assert!(fit.train_score >= 0.999, "train R² = {}", fit.train_score);
        assert!(fit.val_score.is_none());

        // Extrapolation one year out: 3 * 2021 - 6000.
        let pred = fit.model.predict(2021.0);
        assert!((pred - 63.0).abs() < 1e-6, "predicted {pred}");
    }

    #[test]
    fn empty_validation_is_none_not_zero() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 4.0, 9.0, 16.0];
        let fit = fit_polynomial(&x, &y, &[], &[], 2).unwrap();
        assert!(fit.val_score.is_none());
    }

    #[test]
    fn validation_score_is_computed_when_present() {
        let x: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| 2.0 * v + 1.0).collect();
        let fit = fit_polynomial(&x[..8], &y[..8], &x[8..], &y[8..], 1).unwrap();
        let val = fit.val_score.unwrap();
        // Noiseless line held out: near-perfect, except the two-point
        // validation set has nonzero variance so R² is well-defined.
        assert!(val > 0.999, "val R² = {val}");
    }

    #[test]
    fn underdetermined_degree_still_solves() {
        // 3 points, degree 5: minimum-norm interpolation, no error.
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 3.0, 5.0];
        let fit = fit_polynomial(&x, &y, &[], &[], 5).unwrap();
        assert!(fit.train_score > 0.999);
    }

    #[test]
    fn degree_zero_is_rejected() {
        let err = fit_polynomial(&[1.0, 2.0], &[1.0, 2.0], &[], &[], 0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

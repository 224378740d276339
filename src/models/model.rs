//! Fitted polynomial model.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given x value and degree (for OLS)
//! - predict y(x) given fitted coefficients (for curves/extrapolation)
//!
//! Both evaluate in the normalized basis (see `math::basis`): the model
//! stores the x normalization it was fit with, so a prediction at any x
//! (including one year past the observed range) uses the same feature
//! expansion as training.

use serde::{Deserialize, Serialize};

use crate::math::{normalize_x, power_row};

/// A fitted polynomial of a given degree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyModel {
    pub degree: usize,
    /// Coefficients from the intercept upward (length `degree + 1`),
    /// in the normalized basis.
    pub coeffs: Vec<f64>,
    /// Affine x normalization: `u = (x - x_offset) / x_scale`.
    pub x_offset: f64,
    pub x_scale: f64,
}

impl PolyModel {
    /// Predict y at a single x value.
    pub fn predict(&self, x: f64) -> f64 {
        let u = normalize_x(x, self.x_offset, self.x_scale);
        // Horner evaluation from the highest coefficient down.
        let mut acc = 0.0;
        for &c in self.coeffs.iter().rev() {
            acc = acc * u + c;
        }
        acc
    }

    /// Predict y at each x value.
    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Fill a design row for this model's basis at the given x value.
    pub fn fill_design_row(&self, x: f64, out: &mut [f64]) {
        let u = normalize_x(x, self.x_offset, self.x_scale);
        power_row(u, self.degree, out);
    }
}

//! Stable polynomial feature basis.
//!
//! The regression expands each x value into powers `1, x, x², …, x^degree`.
//!
//! Numerical notes:
//! - The raw independent variable is a calendar year, so raw powers reach
//!   magnitudes like `2023^14 ≈ 2e46` and the design matrix becomes
//!   catastrophically ill-conditioned.
//! - We therefore map x affinely onto `[-1, 1]` before featurization:
//!   `u = (x - offset) / scale`. Polynomials of degree d in u span exactly
//!   the polynomials of degree d in x, so the fitted function and every
//!   score are unchanged; only the coefficient parameterization differs.
//! - The normalization is derived from the training x-range and stored on
//!   the model, so predictions (including extrapolation past the observed
//!   range) evaluate in the same basis the model was fit in.

/// Smallest usable half-range. Guards a single-point or zero-width x range.
const MIN_SCALE: f64 = 1e-9;

/// Derive the affine normalization `(offset, scale)` from training x values.
///
/// `offset` is the midpoint of the observed range and `scale` its half-width,
/// so training inputs land in `[-1, 1]`.
pub fn x_norm_for(xs: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &x in xs {
        lo = lo.min(x);
        hi = hi.max(x);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let offset = 0.5 * (lo + hi);
    let scale = (0.5 * (hi - lo)).max(MIN_SCALE);
    (offset, scale)
}

/// Apply the affine normalization.
pub fn normalize_x(x: f64, offset: f64, scale: f64) -> f64 {
    (x - offset) / scale
}

/// Fill `out` with the powers `1, u, u², …, u^degree`.
///
/// # Panics
/// Panics if `out` does not have length `degree + 1`. Callers size the row
/// buffer once per fit.
pub fn power_row(u: f64, degree: usize, out: &mut [f64]) {
    debug_assert_eq!(out.len(), degree + 1);
    let mut p = 1.0;
    for slot in out.iter_mut() {
        *slot = p;
        p *= u;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_maps_training_range_to_unit_interval() {
        let xs = [2006.0, 2010.0, 2023.0];
        let (offset, scale) = x_norm_for(&xs);
        assert!((normalize_x(2006.0, offset, scale) - (-1.0)).abs() < 1e-12);
        assert!((normalize_x(2023.0, offset, scale) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn norm_guards_degenerate_range() {
        let (offset, scale) = x_norm_for(&[2020.0]);
        assert_eq!(offset, 2020.0);
        assert!(scale > 0.0);
        assert!(normalize_x(2020.0, offset, scale).is_finite());
    }

    #[test]
    fn power_row_builds_ascending_powers() {
        let mut row = vec![0.0; 4];
        power_row(2.0, 3, &mut row);
        assert_eq!(row, vec![1.0, 2.0, 4.0, 8.0]);
    }
}

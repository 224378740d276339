//! Coefficient of determination (R²).
//!
//! R² = 1 - SS_res / SS_tot. 1.0 is a perfect fit; values can be negative
//! for fits worse than predicting the mean.
//!
//! Edge case: a zero-variance target makes SS_tot = 0 and R² a 0/0. The
//! selection loop compares scores in a `min` reduction, so a NaN here would
//! silently poison the search. Policy: R² is **0.0 by convention** whenever
//! the target has (numerically) zero variance. Deterministic, never NaN.

/// Variance threshold below which the target counts as constant.
const ZERO_VARIANCE_EPS: f64 = 1e-12;

/// Compute R² of predictions against observations.
///
/// # Panics
/// Panics (debug builds) if the slices have different lengths. Callers pass
/// parallel arrays by construction.
pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len());
    if y_true.is_empty() {
        return 0.0;
    }

    let n = y_true.len() as f64;
    let mean = y_true.iter().sum::<f64>() / n;

    let ss_tot: f64 = y_true.iter().map(|&y| (y - mean) * (y - mean)).sum();
    if ss_tot <= ZERO_VARIANCE_EPS * n {
        return 0.0;
    }

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&y, &p)| (y - p) * (y - p))
        .sum();

    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_fit_scores_one() {
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!((r_squared(&y, &y) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn mean_predictor_scores_zero() {
        let y = [1.0, 2.0, 3.0];
        let pred = [2.0, 2.0, 2.0];
        assert!(r_squared(&y, &pred).abs() < 1e-15);
    }

    #[test]
    fn worse_than_mean_is_negative() {
        let y = [1.0, 2.0, 3.0];
        let pred = [3.0, 2.0, 1.0];
        assert!(r_squared(&y, &pred) < 0.0);
    }

    #[test]
    fn constant_target_scores_zero_never_nan() {
        let y = [5.0, 5.0, 5.0];
        let exact = [5.0, 5.0, 5.0];
        let off = [4.0, 5.0, 6.0];
        assert_eq!(r_squared(&y, &exact), 0.0);
        assert_eq!(r_squared(&y, &off), 0.0);
    }
}

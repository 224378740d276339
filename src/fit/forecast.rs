//! One-series forecasting: degree selection + in-sample curve + extrapolation.
//!
//! This is the sole entry point the orchestration layer needs per
//! combination: it consumes a series and a target year and returns the
//! chosen degree, the refit curve over the observed years, the training R²,
//! and the single point estimate at the target year. No error bars.

use crate::domain::{SelectionConfig, Series, SeriesForecast};
use crate::error::AppError;
use crate::fit::selection::select_degree;

/// Select the best degree for the series and extrapolate to `target_year`.
pub fn forecast_series(
    series: &Series,
    target_year: f64,
    config: &SelectionConfig,
) -> Result<SeriesForecast, AppError> {
    let selection = select_degree(series, config)?;

    let fitted = selection.model.predict_many(series.years());
    let prediction = selection.model.predict(target_year);
    if !prediction.is_finite() {
        return Err(AppError::new(
            4,
            format!("Non-finite prediction at target year {target_year}."),
        ));
    }

    Ok(SeriesForecast {
        selection,
        fitted,
        target_year,
        prediction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_series_extrapolates_one_step() {
        let years: Vec<f64> = (2000..=2020).map(|y| y as f64).collect();
        let amounts: Vec<f64> = years.iter().map(|&v| 3.0 * v - 6000.0).collect();
        let series = Series::new(years, amounts).unwrap();

        let forecast = forecast_series(&series, 2021.0, &SelectionConfig::default()).unwrap();

        // 3 * 2021 - 6000 = 63. Whatever degree wins, the refit of a
        // noiseless line is the line, so the one-step extrapolation is tight.
        assert!((forecast.prediction - 63.0).abs() < 1e-3, "{}", forecast.prediction);
        assert_eq!(forecast.fitted.len(), series.len());
        for (fit, obs) in forecast.fitted.iter().zip(series.amounts().iter()) {
            assert!((fit - obs).abs() < 1e-6);
        }
    }

    #[test]
    fn forecast_is_deterministic() {
        let years: Vec<f64> = (2006..=2023).map(|y| y as f64).collect();
        let amounts: Vec<f64> = years
            .iter()
            .enumerate()
            .map(|(i, &v)| 50.0 + 2.0 * (v - 2006.0) + ((i * 31) % 7) as f64)
            .collect();
        let series = Series::new(years, amounts).unwrap();
        let config = SelectionConfig::default();

        let a = forecast_series(&series, 2024.0, &config).unwrap();
        let b = forecast_series(&series, 2024.0, &config).unwrap();
        assert_eq!(a.selection.degree, b.selection.degree);
        assert_eq!(a.prediction.to_bits(), b.prediction.to_bits());
    }
}

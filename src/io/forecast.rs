//! Read/write forecast JSON files.
//!
//! Forecast JSON is the "portable" representation of one combination's
//! result:
//! - the observed series and its key
//! - the refit model (degree, coefficients, x normalization)
//! - the in-sample curve and the target-year extrapolation
//!
//! Enough to re-render a plot later without refitting or re-reading the
//! table. The schema is defined by `domain::ForecastFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{ForecastFile, Series, SeriesForecast, SeriesKey};
use crate::error::AppError;

/// Assemble the portable file contents for one combination.
pub fn forecast_file(key: &SeriesKey, series: &Series, forecast: &SeriesForecast) -> ForecastFile {
    ForecastFile {
        tool: "dla".to_string(),
        key: key.clone(),
        series: series.clone(),
        model: forecast.selection.model.clone(),
        degree: forecast.selection.degree,
        train_score: forecast.selection.train_score,
        fitted: forecast.fitted.clone(),
        target_year: forecast.target_year,
        prediction: forecast.prediction,
    }
}

/// Write a forecast JSON file.
pub fn write_forecast_json(path: &Path, contents: &ForecastFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create forecast JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, contents)
        .map_err(|e| AppError::new(2, format!("Failed to write forecast JSON: {e}")))?;

    Ok(())
}

/// Read a forecast JSON file.
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open forecast JSON '{}': {e}", path.display()))
    })?;
    let contents: ForecastFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid forecast JSON: {e}")))?;
    Ok(contents)
}

//! Export per-combination results.
//!
//! The CSV export is meant to be easy to consume in spreadsheets or
//! downstream scripts; plot text files land in the per-combination
//! directory tree under the output directory.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{SeriesForecast, SeriesKey};
use crate::error::AppError;

/// Write one row per successfully forecast combination.
pub fn write_forecasts_csv(
    path: &Path,
    forecasts: &[(SeriesKey, SeriesForecast)],
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "species,cause,owner,degree,train_score,target_year,prediction")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (key, forecast) in forecasts {
        writeln!(
            file,
            "{},{},{},{},{:.6},{},{:.4}",
            csv_field(&key.species),
            csv_field(&key.cause),
            csv_field(&key.owner),
            forecast.selection.degree,
            forecast.selection.train_score,
            forecast.target_year,
            forecast.prediction,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Quote a field if it contains CSV-significant characters.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Directory for one combination's outputs:
/// `out_dir/<species>/<cause>/<owner>` with sanitized segments.
pub fn combination_dir(out_dir: &Path, key: &SeriesKey) -> PathBuf {
    let [species, cause, owner] = key.path_segments();
    out_dir.join(species).join(cause).join(owner)
}

/// Write a rendered plot into the combination's directory.
pub fn write_plot_text(out_dir: &Path, key: &SeriesKey, plot: &str) -> Result<PathBuf, AppError> {
    let dir = combination_dir(out_dir, key);
    create_dir_all(&dir)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", dir.display())))?;

    let path = dir.join("plot.txt");
    std::fs::write(&path, plot)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    Ok(path)
}

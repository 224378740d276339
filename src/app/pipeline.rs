//! Shared analysis pipeline used by the `analyze` and `rank` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> group -> per-combination degree selection -> forecasts -> ranking
//!
//! The command handlers can then focus on presentation (printing vs exports).
//!
//! Each combination is an isolated unit of work: read-only series in,
//! forecast out, no shared mutable state. Combinations therefore run on a
//! rayon parallel iterator, and per-series failures are collected as skipped
//! combinations instead of aborting the batch.

use rayon::prelude::*;

use crate::domain::{AnalysisConfig, SeriesForecast, SeriesKey};
use crate::error::AppError;
use crate::fit::forecast::forecast_series;
use crate::io::ingest::{load_damage_table, IngestedTable};

/// All computed outputs of a single analysis run.
#[derive(Debug)]
pub struct RunOutput {
    pub table: IngestedTable,
    /// Successful forecasts in deterministic (grouped key) order.
    pub forecasts: Vec<(SeriesKey, SeriesForecast)>,
    /// Combinations whose selection failed and why.
    pub skipped: Vec<(SeriesKey, String)>,
    pub target_year: f64,
}

/// Execute the full analysis pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    // Configuration errors abort the whole run before any series is touched.
    config.selection.validate()?;

    let table = load_damage_table(config)?;
    if table.series.is_empty() {
        return Err(AppError::new(
            3,
            "No usable series in the table after filtering.",
        ));
    }

    let target_year = resolve_target_year(config, &table);
    log::debug!(
        "analysis: {} combinations, target year {target_year}",
        table.series.len()
    );

    // Embarrassingly parallel across combinations; collect() preserves the
    // input order so output stays deterministic.
    let results: Vec<(SeriesKey, Result<SeriesForecast, AppError>)> = table
        .series
        .iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(key, series)| {
            (
                key.clone(),
                forecast_series(series, target_year, &config.selection),
            )
        })
        .collect();

    let mut forecasts = Vec::new();
    let mut skipped = Vec::new();
    for (key, result) in results {
        match result {
            Ok(forecast) => forecasts.push((key, forecast)),
            Err(e) => skipped.push((key, e.to_string())),
        }
    }

    if !skipped.is_empty() {
        log::warn!("{} combinations skipped during selection", skipped.len());
    }

    Ok(RunOutput {
        table,
        forecasts,
        skipped,
        target_year,
    })
}

/// The year to extrapolate to: explicit flag, or one past the last observed year.
fn resolve_target_year(config: &AnalysisConfig, table: &IngestedTable) -> f64 {
    match config.target_year {
        Some(year) => year as f64,
        None => {
            let last = table
                .series
                .values()
                .map(|s| s.last_year())
                .fold(f64::NEG_INFINITY, f64::max);
            last + 1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::default_analysis_config;
    use crate::data::{generate_sample_rows, write_sample_csv, SampleConfig};
    use std::path::PathBuf;

    fn write_demo_table(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dla_{name}_{}.csv", std::process::id()));
        let rows = generate_sample_rows(&SampleConfig::default()).unwrap();
        write_sample_csv(&path, &rows).unwrap();
        path
    }

    #[test]
    fn pipeline_forecasts_every_combination() {
        let path = write_demo_table("pipeline_all");
        let config = default_analysis_config(path.clone());

        let run = run_analysis(&config).unwrap();

        // 4 species x 3 causes x 3 owners, 18 years each: all long enough.
        assert_eq!(run.forecasts.len() + run.skipped.len(), 36);
        assert!(run.skipped.is_empty(), "skipped: {:?}", run.skipped);
        assert_eq!(run.target_year, 2024.0);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn pipeline_is_deterministic() {
        let path = write_demo_table("pipeline_det");
        let config = default_analysis_config(path.clone());

        let a = run_analysis(&config).unwrap();
        let b = run_analysis(&config).unwrap();

        assert_eq!(a.forecasts.len(), b.forecasts.len());
        for ((ka, fa), (kb, fb)) in a.forecasts.iter().zip(b.forecasts.iter()) {
            assert_eq!(ka, kb);
            assert_eq!(fa.selection.degree, fb.selection.degree);
            assert_eq!(fa.prediction.to_bits(), fb.prediction.to_bits());
        }

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn filters_reduce_the_combination_set() {
        let path = write_demo_table("pipeline_filter");
        let mut config = default_analysis_config(path.clone());
        config.filter_species = Some("Eiche".to_string());

        let run = run_analysis(&config).unwrap();
        assert_eq!(run.forecasts.len(), 9); // 3 causes x 3 owners
        assert!(run.forecasts.iter().all(|(k, _)| k.species == "Eiche"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn explicit_target_year_wins() {
        let path = write_demo_table("pipeline_target");
        let mut config = default_analysis_config(path.clone());
        config.target_year = Some(2030);

        let run = run_analysis(&config).unwrap();
        assert_eq!(run.target_year, 2030.0);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_selection_config_is_fatal() {
        let path = write_demo_table("pipeline_badcfg");
        let mut config = default_analysis_config(path.clone());
        config.selection.k = 1;

        let err = run_analysis(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let _ = std::fs::remove_file(path);
    }
}

//! Reporting utilities: rankings and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{AnalysisConfig, DegreeSelection, SeriesForecast, SeriesKey};
use crate::io::ingest::IngestedTable;

/// Rank combinations by predicted target-year amount, largest first.
///
/// Ties (and the order of equal predictions) stay stable, so the grouped
/// BTreeMap ordering of the input decides between equals.
pub fn rank_by_prediction(
    forecasts: &[(SeriesKey, SeriesForecast)],
    top_n: usize,
) -> Vec<(SeriesKey, SeriesForecast)> {
    let mut sorted = forecasts.to_vec();
    sorted.sort_by(|a, b| {
        b.1.prediction
            .partial_cmp(&a.1.prediction)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}

/// Format the full run summary (table stats + per-series failures).
pub fn format_run_summary(
    table: &IngestedTable,
    forecast_count: usize,
    skipped: &[(SeriesKey, String)],
    config: &AnalysisConfig,
    target_year: f64,
) -> String {
    let mut out = String::new();

    out.push_str("=== dla - Damaged Wood Forecast ===\n");
    out.push_str(&format!("Table: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Rows: {} read | {} used | {} placeholder | {} filtered | {} bad\n",
        table.stats.rows_read,
        table.stats.rows_used,
        table.stats.placeholder_rows,
        table.stats.filtered_rows,
        table.row_errors.len(),
    ));
    out.push_str(&format!(
        "Years: {}..{} | target: {:.0}\n",
        table.stats.year_min, table.stats.year_max, target_year
    ));
    out.push_str(&format!(
        "Selection: degrees {}..{} | k={} | seed={}\n",
        config.selection.degrees.first().copied().unwrap_or(0),
        config.selection.degrees.last().copied().unwrap_or(0),
        config.selection.k,
        config.selection.seed,
    ));
    out.push_str(&format!(
        "Combinations: {} | forecast: {} | skipped: {}\n",
        table.series.len(),
        forecast_count,
        skipped.len() + table.series_errors.len(),
    ));

    for (key, reason) in &table.series_errors {
        out.push_str(&format!("  (bad series {}) {reason}\n", key.label()));
    }
    for (key, reason) in skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", key.label()));
    }

    out
}

/// Format the top-N ranking of predicted target-year amounts.
pub fn format_ranking(ranked: &[(SeriesKey, SeriesForecast)], target_year: f64) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Top predicted damaged wood in {target_year:.0} (1000 cbm):\n"
    ));
    out.push_str(&format!(
        "{:>4}  {:>12}  {:>6}  {:>9}  combination\n",
        "rank", "prediction", "degree", "train R²"
    ));

    for (i, (key, forecast)) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:>12.2}  {:>6}  {:>9.3}  {}\n",
            i + 1,
            forecast.prediction,
            forecast.selection.degree,
            forecast.selection.train_score,
            key.label(),
        ));
    }

    out
}

/// Format the per-degree cross-validation diagnostics for one combination.
pub fn format_degree_diagnostics(key: &SeriesKey, selection: &DegreeSelection) -> String {
    let mut out = String::new();

    out.push_str(&format!("Degree search for {}:\n", key.label()));
    for score in &selection.scores {
        let chosen = if score.degree == selection.degree { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} degree {:>2}  avg|val R²|={:.6}  avg|train R²|={:.6}\n",
            score.degree, score.avg_val_score, score.avg_train_score
        ));
    }
    for (degree, reason) in &selection.skipped {
        out.push_str(&format!("  (skipped degree {degree}) {reason}\n"));
    }
    out.push_str(&format!(
        "Chosen: degree {} | full-refit train R² = {:.6}\n",
        selection.degree, selection.train_score
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SelectionConfig, Series};
    use crate::fit::forecast::forecast_series;

    fn forecast_for(slope: f64) -> (SeriesKey, SeriesForecast) {
        let years: Vec<f64> = (2006..=2023).map(|y| y as f64).collect();
        let amounts: Vec<f64> = years.iter().map(|&v| slope * (v - 2006.0) + 10.0).collect();
        let series = Series::new(years, amounts).unwrap();
        let forecast = forecast_series(&series, 2024.0, &SelectionConfig::default()).unwrap();
        (
            SeriesKey::new(format!("S{slope}"), "Wind", "Staatswald"),
            forecast,
        )
    }

    #[test]
    fn ranking_sorts_by_prediction_descending() {
        let forecasts = vec![forecast_for(1.0), forecast_for(5.0), forecast_for(3.0)];
        let ranked = rank_by_prediction(&forecasts, 10);

        assert_eq!(ranked.len(), 3);
        assert!(ranked[0].1.prediction >= ranked[1].1.prediction);
        assert!(ranked[1].1.prediction >= ranked[2].1.prediction);
        assert_eq!(ranked[0].0.species, "S5");
    }

    #[test]
    fn ranking_truncates_to_top_n() {
        let forecasts = vec![forecast_for(1.0), forecast_for(5.0), forecast_for(3.0)];
        let ranked = rank_by_prediction(&forecasts, 2);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn diagnostics_mark_the_chosen_degree() {
        let (key, forecast) = forecast_for(2.0);
        let text = format_degree_diagnostics(&key, &forecast.selection);
        assert!(text.contains("* degree"));
        assert!(text.contains("Chosen: degree"));
    }
}

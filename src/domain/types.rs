//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during model selection
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::PolyModel;

/// Identifies one time series in the damage table:
/// tree species × damage cause × ownership category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub species: String,
    pub cause: String,
    pub owner: String,
}

impl SeriesKey {
    pub fn new(species: impl Into<String>, cause: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            cause: cause.into(),
            owner: owner.into(),
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> String {
        format!("{} / {} / {}", self.species, self.cause, self.owner)
    }

    /// Filesystem-safe path segments for per-combination output directories.
    ///
    /// The statistics table uses free-text category names; slashes and spaces
    /// would otherwise leak into the directory structure.
    pub fn path_segments(&self) -> [String; 3] {
        [
            sanitize_segment(&self.species),
            sanitize_segment(&self.cause),
            sanitize_segment(&self.owner),
        ]
    }
}

fn sanitize_segment(raw: &str) -> String {
    raw.replace(['/', ' '], "_")
}

/// One observed time series: amounts of damaged wood per calendar year.
///
/// Invariants (enforced by `new`):
/// - `years` and `amounts` have equal, non-zero length
/// - years are strictly increasing (no duplicates)
/// - all values are finite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    years: Vec<f64>,
    amounts: Vec<f64>,
}

impl Series {
    /// Validate and construct a series.
    ///
    /// Errors are returned as plain strings because series construction
    /// happens per combination during ingest, where failures are collected
    /// and reported rather than aborting the batch.
    pub fn new(years: Vec<f64>, amounts: Vec<f64>) -> Result<Self, String> {
        if years.is_empty() {
            return Err("Empty series.".to_string());
        }
        if years.len() != amounts.len() {
            return Err(format!(
                "Year/amount length mismatch: {} vs {}.",
                years.len(),
                amounts.len()
            ));
        }
        if years.iter().any(|v| !v.is_finite()) || amounts.iter().any(|v| !v.is_finite()) {
            return Err("Non-finite value in series.".to_string());
        }
        for w in years.windows(2) {
            if w[1] <= w[0] {
                return Err(format!("Years not strictly increasing: {} then {}.", w[0], w[1]));
            }
        }
        Ok(Self { years, amounts })
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[f64] {
        &self.years
    }

    pub fn amounts(&self) -> &[f64] {
        &self.amounts
    }

    pub fn last_year(&self) -> f64 {
        *self.years.last().expect("series is non-empty by construction")
    }
}

/// Cross-validation configuration for degree selection.
///
/// One explicit structure instead of constants scattered across callers:
/// the candidate degrees, the fold count, and the shuffle seed together
/// determine the selection outcome, so they travel together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Candidate polynomial degrees, ascending. Degree 0 is not used.
    pub degrees: Vec<usize>,
    /// Number of cross-validation folds.
    pub k: usize,
    /// Seed for the fold shuffle. Fixed seed keeps selection reproducible.
    pub seed: u64,
}

impl SelectionConfig {
    /// The historical default: degrees 1..=14, 9 folds, seed 0.
    pub fn with_max_degree(max_degree: usize, k: usize, seed: u64) -> Self {
        Self {
            degrees: (1..=max_degree.max(1)).collect(),
            k,
            seed,
        }
    }

    /// Validate the configuration. Configuration errors are fatal for the
    /// whole run (exit code 2), unlike per-series data problems.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.degrees.is_empty() {
            return Err(AppError::new(2, "Candidate degree list must not be empty."));
        }
        if self.degrees.iter().any(|&d| d == 0) {
            return Err(AppError::new(2, "Candidate degrees must be >= 1."));
        }
        for w in self.degrees.windows(2) {
            if w[1] <= w[0] {
                return Err(AppError::new(2, "Candidate degrees must be strictly ascending."));
            }
        }
        if self.k < 2 {
            return Err(AppError::new(2, "Fold count k must be >= 2."));
        }
        Ok(())
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self::with_max_degree(14, 9, 0)
    }
}

/// Per-degree cross-validation diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeScore {
    pub degree: usize,
    /// `|mean(train R² across folds)|`, diagnostic only.
    pub avg_train_score: f64,
    /// `|mean(validation R² across folds)|`, the selection metric.
    pub avg_val_score: f64,
}

/// Final output of degree selection for one series.
#[derive(Debug, Clone)]
pub struct DegreeSelection {
    /// Model refit on the entire series with the chosen degree.
    pub model: PolyModel,
    pub degree: usize,
    /// Training R² of the full refit.
    pub train_score: f64,
    /// Diagnostics for every degree that was actually cross-validated.
    pub scores: Vec<DegreeScore>,
    /// Degrees that were skipped and why (underdetermined on the smallest
    /// training fold).
    pub skipped: Vec<(usize, String)>,
}

/// One combination's forecast: the refit curve plus the target-year value.
#[derive(Debug, Clone)]
pub struct SeriesForecast {
    pub selection: DegreeSelection,
    /// In-sample predictions at each observed year.
    pub fitted: Vec<f64>,
    pub target_year: f64,
    pub prediction: f64,
}

/// A saved forecast file (JSON): everything needed to re-render a plot
/// without access to the original table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub key: SeriesKey,
    pub series: Series,
    pub model: PolyModel,
    pub degree: usize,
    pub train_score: f64,
    pub fitted: Vec<f64>,
    pub target_year: f64,
    pub prediction: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub out_dir: PathBuf,
    /// Year to extrapolate to. `None` means one year past the last observed year.
    pub target_year: Option<i32>,
    pub selection: SelectionConfig,

    pub filter_species: Option<String>,
    pub filter_cause: Option<String>,
    pub filter_owner: Option<String>,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_forecasts: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

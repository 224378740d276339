//! Command-line parsing for the damaged-wood forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dla", version, about = "Damaged-wood statistics analyzer and forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a damage table: per-combination degree selection, forecasts,
    /// ranking, plots, and optional exports.
    Analyze(AnalyzeArgs),
    /// Print the forecast ranking only (useful for scripting).
    Rank(AnalyzeArgs),
    /// Plot a previously exported forecast JSON.
    Plot(PlotArgs),
    /// Write a synthetic demo table in the expected CSV schema.
    Sample(SampleArgs),
}

/// Common options for analyzing and ranking.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Path to the CSV containing the statistic
    /// (columns: year, species, cause, owner, amount).
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Directory for per-combination plot files.
    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Year to extrapolate to. Defaults to one year past the last observed year.
    #[arg(long)]
    pub target_year: Option<i32>,

    /// Highest candidate polynomial degree (search runs 1..=N).
    #[arg(long, default_value_t = 14)]
    pub max_degree: usize,

    /// Number of cross-validation folds.
    #[arg(short = 'k', long, default_value_t = 9)]
    pub folds: usize,

    /// Seed for the fold shuffle (fixed seed keeps selection reproducible).
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Only analyze combinations with this species.
    #[arg(long)]
    pub species: Option<String>,

    /// Only analyze combinations with this damage cause.
    #[arg(long)]
    pub cause: Option<String>,

    /// Only analyze combinations with this ownership category.
    #[arg(long)]
    pub owner: Option<String>,

    /// Show the top-N combinations by predicted amount.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Write per-combination plot files (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable plot files.
    #[arg(long)]
    pub no_plot: bool,

    /// Print per-degree cross-validation diagnostics for the ranked combinations.
    #[arg(long)]
    pub diagnostics: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-combination forecasts to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export per-combination forecast JSON files into this directory.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved forecast.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Forecast JSON file produced by `dla analyze --export-json`.
    #[arg(long, value_name = "JSON")]
    pub forecast: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for synthetic table generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Where to write the demo table.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Seed for the noise generator.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First calendar year in the table.
    #[arg(long, default_value_t = 2006)]
    pub first_year: i32,

    /// Number of years per combination.
    #[arg(long, default_value_t = 18)]
    pub years: usize,
}

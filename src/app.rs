//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, PlotArgs, SampleArgs};
use crate::domain::{AnalysisConfig, SelectionConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `dla` binary.
pub fn run() -> Result<(), AppError> {
    // We want `dla table.csv` to behave like `dla analyze table.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the convenient UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args, OutputMode::Full),
        Command::Rank(args) => handle_analyze(args, OutputMode::RankOnly),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

fn handle_analyze(args: AnalyzeArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_run_summary(
                &run.table,
                run.forecasts.len(),
                &run.skipped,
                &config,
                run.target_year
            )
        );
    }

    let ranked = crate::report::rank_by_prediction(&run.forecasts, config.top_n);
    println!("{}", crate::report::format_ranking(&ranked, run.target_year));

    if args.diagnostics {
        for (key, forecast) in &ranked {
            println!("{}", crate::report::format_degree_diagnostics(key, &forecast.selection));
        }
    }

    if mode == OutputMode::Full && config.plot {
        for (key, forecast) in &run.forecasts {
            let Some(series) = run.table.series.get(key) else {
                continue;
            };
            let plot =
                crate::plot::render_series_plot(series, forecast, config.plot_width, config.plot_height);
            crate::io::export::write_plot_text(&config.out_dir, key, &plot)?;
        }

        // Show the top-ranked combination in the terminal.
        if let Some((key, forecast)) = ranked.first() {
            if let Some(series) = run.table.series.get(key) {
                println!("{}", key.label());
                println!(
                    "{}",
                    crate::plot::render_series_plot(series, forecast, config.plot_width, config.plot_height)
                );
            }
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_forecasts {
        crate::io::export::write_forecasts_csv(path, &run.forecasts)?;
    }
    if let Some(dir) = &config.export_json {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", dir.display())))?;
        for (key, forecast) in &run.forecasts {
            let Some(series) = run.table.series.get(key) else {
                continue;
            };
            let contents = crate::io::forecast::forecast_file(key, series, forecast);
            let [species, cause, owner] = key.path_segments();
            let path = dir.join(format!("{species}.{cause}.{owner}.json"));
            crate::io::forecast::write_forecast_json(&path, &contents)?;
        }
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let contents = crate::io::forecast::read_forecast_json(&args.forecast)?;

    println!("{}", contents.key.label());
    println!(
        "{}",
        crate::plot::render_forecast_file_plot(&contents, args.width, args.height)
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = crate::data::SampleConfig {
        seed: args.seed,
        first_year: args.first_year,
        years: args.years,
    };
    let rows = crate::data::generate_sample_rows(&config)?;
    crate::data::write_sample_csv(&args.out, &rows)?;

    println!("Wrote {} rows to {}", rows.len(), args.out.display());
    Ok(())
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        csv_path: args.csv.clone(),
        out_dir: args.out_dir.clone(),
        target_year: args.target_year,
        selection: SelectionConfig::with_max_degree(args.max_degree, args.folds, args.seed),
        filter_species: args.species.clone(),
        filter_cause: args.cause.clone(),
        filter_owner: args.owner.clone(),
        top_n: args.top,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_forecasts: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}

/// Default configuration for a table path; used by tests and simple callers.
pub fn default_analysis_config(csv_path: PathBuf) -> AnalysisConfig {
    AnalysisConfig {
        csv_path,
        out_dir: PathBuf::from("out"),
        target_year: None,
        selection: SelectionConfig::default(),
        filter_species: None,
        filter_cause: None,
        filter_owner: None,
        top_n: 10,
        plot: false,
        plot_width: 100,
        plot_height: 25,
        export_forecasts: None,
        export_json: None,
    }
}

/// Rewrite argv so `dla <csv>` defaults to `dla analyze <csv>`.
///
/// Rules:
/// - `dla table.csv ...`       -> `dla analyze table.csv ...`
/// - `dla --seed 1 table.csv`  -> `dla analyze --seed 1 table.csv`
/// - `dla --help/--version/-h` -> unchanged (show top-level help/version)
/// - explicit subcommands      -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "rank" | "plot" | "sample");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "analyze".to_string());
    argv
}

//! CSV ingest and grouping.
//!
//! This module turns the yearly damage statistics table into one clean
//! time series per (species, cause, owner) combination.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (BTreeMap grouping, no hidden randomness)
//! - **Separation of concerns**: no fitting logic here
//!
//! Expected columns (case-insensitive): `year, species, cause, owner, amount`.
//! The official statistics export pads unavailable cells with placeholder
//! runs of underscores; such rows are filtered out and counted rather than
//! reported as errors.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;

use csv::StringRecord;

use crate::domain::{AnalysisConfig, Series, SeriesKey};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 5] = ["year", "species", "cause", "owner", "amount"];

/// A validated input row.
#[derive(Debug, Clone)]
pub struct DamageRow {
    pub year: i32,
    pub key: SeriesKey,
    pub amount: f64,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Summary stats about the table actually used for fitting.
#[derive(Debug, Clone)]
pub struct TableStats {
    pub rows_read: usize,
    pub rows_used: usize,
    pub placeholder_rows: usize,
    pub filtered_rows: usize,
    pub year_min: i32,
    pub year_max: i32,
}

/// Ingest output: grouped series + stats + per-row and per-series errors.
#[derive(Debug)]
pub struct IngestedTable {
    pub series: BTreeMap<SeriesKey, Series>,
    pub stats: TableStats,
    pub row_errors: Vec<RowError>,
    /// Combinations that could not form a valid series and why.
    pub series_errors: Vec<(SeriesKey, String)>,
}

/// Load the damage table and group it into per-combination series.
pub fn load_damage_table(config: &AnalysisConfig) -> Result<IngestedTable, AppError> {
    let file = File::open(&config.csv_path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open CSV '{}': {e}", config.csv_path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map, &headers)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut placeholder_rows = 0usize;
    let mut filtered_rows = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header row and CSV line
        // numbers are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(Some(row)) => {
                if !passes_filters(&row.key, config) {
                    filtered_rows += 1;
                    continue;
                }
                rows.push(row);
            }
            Ok(None) => placeholder_rows += 1,
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        log::warn!("{} rows skipped due to parse errors", row_errors.len());
    }
    log::debug!(
        "ingest: {} rows read, {} usable, {} placeholder, {} filtered",
        rows_read,
        rows.len(),
        placeholder_rows,
        filtered_rows
    );

    let rows_used = rows.len();
    let year_min = rows.iter().map(|r| r.year).min().unwrap_or(0);
    let year_max = rows.iter().map(|r| r.year).max().unwrap_or(0);

    let (series, series_errors) = group_rows(rows);

    Ok(IngestedTable {
        series,
        stats: TableStats {
            rows_read,
            rows_used,
            placeholder_rows,
            filtered_rows,
            year_min,
            year_max,
        },
        row_errors,
        series_errors,
    })
}

/// Group validated rows into one series per combination.
///
/// Combinations with duplicate years (or otherwise invalid series) are
/// reported per combination, never aborting the batch.
pub fn group_rows(rows: Vec<DamageRow>) -> (BTreeMap<SeriesKey, Series>, Vec<(SeriesKey, String)>) {
    let mut grouped: BTreeMap<SeriesKey, Vec<(i32, f64)>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.key).or_default().push((row.year, row.amount));
    }

    let mut series = BTreeMap::new();
    let mut errors = Vec::new();

    for (key, mut points) in grouped {
        points.sort_by_key(|&(year, _)| year);

        if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            errors.push((key, format!("Duplicate year {} in series.", w[0].0)));
            continue;
        }

        let years: Vec<f64> = points.iter().map(|&(y, _)| y as f64).collect();
        let amounts: Vec<f64> = points.iter().map(|&(_, a)| a).collect();
        match Series::new(years, amounts) {
            Ok(s) => {
                series.insert(key, s);
            }
            Err(message) => errors.push((key, message)),
        }
    }

    (series, errors)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn ensure_required_columns_exist(
    header_map: &HashMap<String, usize>,
    headers: &StringRecord,
) -> Result<(), AppError> {
    for col in REQUIRED_COLUMNS {
        if !header_map.contains_key(col) {
            let available: Vec<&str> = headers.iter().collect();
            return Err(AppError::new(
                2,
                format!(
                    "CSV does not contain a '{col}' column. Available columns: {}",
                    available.join(", ")
                ),
            ));
        }
    }
    Ok(())
}

/// Parse one record. `Ok(None)` means a placeholder row (filtered, not an error).
fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Option<DamageRow>, String> {
    let field = |name: &str| -> Result<&str, String> {
        let idx = header_map[name];
        record
            .get(idx)
            .ok_or_else(|| format!("Missing '{name}' field."))
    };

    let species = field("species")?;
    let cause = field("cause")?;
    let owner = field("owner")?;
    let year_raw = field("year")?;
    let amount_raw = field("amount")?;

    // Placeholder cells ("__________") mark unavailable combinations in the
    // official export.
    if is_placeholder(species)
        || is_placeholder(cause)
        || is_placeholder(owner)
        || is_placeholder(amount_raw)
    {
        return Ok(None);
    }

    if species.is_empty() || cause.is_empty() || owner.is_empty() {
        return Err("Empty category field.".to_string());
    }

    let year: i32 = year_raw
        .parse()
        .map_err(|_| format!("Invalid year '{year_raw}'."))?;

    let amount: f64 = amount_raw
        .parse()
        .map_err(|_| format!("Invalid amount '{amount_raw}'."))?;
    if !amount.is_finite() {
        return Err(format!("Non-finite amount '{amount_raw}'."));
    }

    Ok(Some(DamageRow {
        year,
        key: SeriesKey::new(species, cause, owner),
        amount,
    }))
}

fn is_placeholder(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c == '_')
}

fn passes_filters(key: &SeriesKey, config: &AnalysisConfig) -> bool {
    let matches = |filter: &Option<String>, value: &str| {
        filter
            .as_deref()
            .map(|f| f.eq_ignore_ascii_case(value))
            .unwrap_or(true)
    };
    matches(&config.filter_species, &key.species)
        && matches(&config.filter_cause, &key.cause)
        && matches(&config.filter_owner, &key.owner)
}

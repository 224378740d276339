//! ASCII plotting for terminal output and per-combination plot files.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line
//! - target-year extrapolation: `P`

use crate::domain::{ForecastFile, Series, SeriesForecast};
use crate::models::PolyModel;

/// Render a plot for an in-memory forecast.
pub fn render_series_plot(
    series: &Series,
    forecast: &SeriesForecast,
    width: usize,
    height: usize,
) -> String {
    render_plot(
        series,
        &forecast.selection.model,
        forecast.selection.degree,
        forecast.selection.train_score,
        forecast.target_year,
        forecast.prediction,
        width,
        height,
    )
}

/// Render a plot from a saved forecast JSON file.
pub fn render_forecast_file_plot(contents: &ForecastFile, width: usize, height: usize) -> String {
    render_plot(
        &contents.series,
        &contents.model,
        contents.degree,
        contents.train_score,
        contents.target_year,
        contents.prediction,
        width,
        height,
    )
}

fn render_plot(
    series: &Series,
    model: &PolyModel,
    degree: usize,
    train_score: f64,
    target_year: f64,
    prediction: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    // The x-range covers the observed years plus the extrapolation target.
    let x_min = series.years().first().copied().unwrap_or(0.0);
    let x_max = series.last_year().max(target_year);
    let (x_min, x_max) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 0.5, x_max + 0.5)
    };

    let curve = sample_curve(model, x_min, series.last_year(), width.max(2));
    let (y_min, y_max) = y_range(series, &curve, prediction).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so observed points can overlay it.
    draw_curve(&mut grid, &curve, x_min, x_max, y_min, y_max);

    for (&year, &amount) in series.years().iter().zip(series.amounts().iter()) {
        let x = map_x(year, x_min, x_max, width);
        let y = map_y(amount, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let px = map_x(target_year, x_min, x_max, width);
    let py = map_y(prediction, y_min, y_max, height);
    grid[py][px] = 'P';

    // Header with ranges, footer with the fit summary.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: year=[{x_min:.0}, {x_max:.0}] | amount=[{y_min:.2}, {y_max:.2}] (1000 cbm)\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&format!(
        "degree={degree} | train R²={train_score:.3} | {target_year:.0} -> {prediction:.2}\n"
    ));

    out
}

fn sample_curve(model: &PolyModel, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x_min + u * (x_max - x_min);
        out.push((x, model.predict(x)));
    }
    out
}

fn y_range(series: &Series, curve: &[(f64, f64)], prediction: f64) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &a in series.amounts() {
        min_y = min_y.min(a);
        max_y = max_y.max(a);
    }
    for &(_, y) in curve {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    min_y = min_y.min(prediction);
    max_y = max_y.max(prediction);

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, cx, cy, '-');
        } else {
            grid[cy][cx] = '-';
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

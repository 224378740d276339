mod ascii;

pub use ascii::{render_forecast_file_plot, render_series_plot};

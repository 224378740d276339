mod format;

pub use format::{format_degree_diagnostics, format_ranking, format_run_summary, rank_by_prediction};

pub mod basis;
pub mod ols;
pub mod score;

pub use basis::{normalize_x, power_row, x_norm_for};
pub use ols::solve_least_squares;
pub use score::r_squared;

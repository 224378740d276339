pub mod fitter;
pub mod folds;
pub mod forecast;
pub mod selection;

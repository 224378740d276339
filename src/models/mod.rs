pub mod model;

pub use model::PolyModel;

pub mod sample;

pub use sample::{generate_sample_rows, write_sample_csv, SampleConfig};

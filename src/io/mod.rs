pub mod export;
pub mod forecast;
pub mod ingest;

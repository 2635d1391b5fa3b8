//! parbench library: application logic for the benchmark harness binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;

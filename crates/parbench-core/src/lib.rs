//! # parbench-core
//!
//! Core library for the parbench benchmark harness: the algorithm catalog,
//! configuration matrix, dataset provisioning, worker protocol, timing
//! extraction and speedup statistics. Nothing here spawns processes.

pub mod cancel;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod matrix;
pub mod protocol;
pub mod provision;
pub mod stats;
pub mod timing;

// Re-exports
pub use cancel::CancellationToken;
pub use catalog::{AlgorithmSpec, InputMode, Workload, CATALOG};
pub use constants::exit_codes;
pub use error::{BenchError, TrialContext};
pub use matrix::{build_matrix, ConfigurationPoint, ExperimentPlan, SeriesPlan};
pub use protocol::{WorkerArgs, WorkerRequest};
pub use provision::{Dataset, DatasetProvisioner};
pub use stats::{AggregatedSeries, DerivedSeries, ResultsContext, SeriesPoint};
pub use timing::TimingExtractor;

//! # parbench-orchestration
//!
//! Worker process execution, the optional build step, and the sequential
//! experiment pipeline.

pub mod build;
pub mod interfaces;
pub mod orchestrator;
pub mod worker;

pub use interfaces::{NullProgressReporter, ProgressReporter, ResultPresenter};
pub use orchestrator::ExperimentRunner;
pub use worker::{LaunchCommand, ProcessWorker, Worker, WorkerOutput};

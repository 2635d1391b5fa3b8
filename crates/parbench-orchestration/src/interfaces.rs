//! Orchestration interfaces.

use std::path::PathBuf;

use parbench_core::error::TrialContext;
use parbench_core::matrix::ConfigurationPoint;
use parbench_core::stats::DerivedSeries;

/// Trait for reporting run progress to the user.
pub trait ProgressReporter: Send + Sync {
    /// Called once before the first trial with the total invocation count.
    fn on_plan(&self, total_trials: u64);

    /// Called after each successfully measured trial.
    fn on_trial(&self, context: &TrialContext, seconds: f64);

    /// Called once all trials of a configuration point are averaged.
    fn on_point(&self, point: &ConfigurationPoint, mean_seconds: f64);

    /// Report completion.
    fn complete(&self);
}

/// Trait for presenting aggregated results to the user.
pub trait ResultPresenter {
    /// Present one derived series.
    fn present_series(&self, series: &DerivedSeries);

    /// Present the files written by the report emitter.
    fn present_artifacts(&self, paths: &[PathBuf]);

    /// Present a fatal error.
    fn present_error(&self, error: &str);
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn on_plan(&self, _total_trials: u64) {}
    fn on_trial(&self, _context: &TrialContext, _seconds: f64) {}
    fn on_point(&self, _point: &ConfigurationPoint, _mean_seconds: f64) {}
    fn complete(&self) {}
}

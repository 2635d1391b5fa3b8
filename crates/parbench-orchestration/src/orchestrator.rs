//! Sequential experiment pipeline.
//!
//! Series run one after another, process counts ascending within a series,
//! trials back to back. Nothing runs concurrently: overlapping invocations
//! would contend for the cores being measured.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use parbench_core::cancel::CancellationToken;
use parbench_core::catalog::Workload;
use parbench_core::constants::DEFAULT_SEED;
use parbench_core::error::{BenchError, TrialContext};
use parbench_core::matrix::{ConfigurationPoint, ExperimentPlan};
use parbench_core::protocol::{WorkerArgs, WorkerRequest};
use parbench_core::provision::{Dataset, DatasetProvisioner};
use parbench_core::stats::ResultsContext;
use parbench_core::timing::TimingExtractor;

use crate::interfaces::{NullProgressReporter, ProgressReporter};
use crate::worker::Worker;

/// Drives every configuration point of a plan through a [`Worker`].
pub struct ExperimentRunner<'a> {
    worker: &'a dyn Worker,
    provisioner: DatasetProvisioner,
    extractor: TimingExtractor,
    reporter: &'a dyn ProgressReporter,
    cancel: CancellationToken,
    targets: StdRng,
}

impl<'a> ExperimentRunner<'a> {
    #[must_use]
    pub fn new(worker: &'a dyn Worker, provisioner: DatasetProvisioner) -> Self {
        Self {
            worker,
            provisioner,
            extractor: TimingExtractor::default(),
            reporter: &NullProgressReporter,
            cancel: CancellationToken::new(),
            targets: StdRng::seed_from_u64(DEFAULT_SEED),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: TimingExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: &'a dyn ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Seed for the search targets drawn per trial.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.targets = StdRng::seed_from_u64(seed);
        self
    }

    /// Execute the whole plan, stopping at the first failure.
    pub fn run(&mut self, plan: &ExperimentPlan) -> Result<ResultsContext, BenchError> {
        plan.validate()?;
        self.reporter.on_plan(plan.total_trials());

        let mut results = ResultsContext::new();
        for series in plan.series() {
            self.cancel.check_cancelled()?;
            let dataset = self.provisioner.provision(&series.algorithm, series.requested_size)?;
            tracing::info!(
                algorithm = series.algorithm.name,
                size = series.size,
                processes = ?series.process_counts,
                "running series"
            );

            for point in series.points() {
                let durations = self.run_point(&point, dataset.as_ref(), plan.trials)?;
                let avg = results.record(&point, &durations)?;
                tracing::info!(
                    algorithm = point.algorithm.name,
                    size = point.size,
                    processes = point.processes,
                    mean_seconds = avg,
                    "point complete"
                );
                self.reporter.on_point(&point, avg);
            }
        }

        self.reporter.complete();
        Ok(results)
    }

    fn run_point(
        &mut self,
        point: &ConfigurationPoint,
        dataset: Option<&Dataset>,
        trials: u32,
    ) -> Result<Vec<f64>, BenchError> {
        let mut durations = Vec::with_capacity(trials as usize);
        for trial in 0..trials {
            self.cancel.check_cancelled()?;
            let context = TrialContext {
                algorithm: point.algorithm.name.to_string(),
                size: point.size,
                processes: point.processes,
                trial,
            };
            let request = self.request(point, dataset)?;
            let output = self.worker.run(&request, &context)?;
            let seconds = self.extractor.require(&output.stdout, &context)?;
            tracing::debug!(
                %context,
                seconds,
                wall_ms = output.wall_time.as_millis(),
                "trial measured"
            );
            self.reporter.on_trial(&context, seconds);
            durations.push(seconds);
        }
        Ok(durations)
    }

    fn request(
        &mut self,
        point: &ConfigurationPoint,
        dataset: Option<&Dataset>,
    ) -> Result<WorkerRequest, BenchError> {
        let args = match point.algorithm.workload {
            Workload::PrimeRange => WorkerArgs::PrimeRange {
                lower: 1,
                upper: point.size,
            },
            Workload::Search => WorkerArgs::Search {
                dataset: require_dataset(point, dataset)?,
                target: self.targets.random_range(0..point.size),
            },
            Workload::Sort => WorkerArgs::Sort {
                dataset: require_dataset(point, dataset)?,
            },
        };
        WorkerRequest::new(&point.algorithm, args)
    }
}

fn require_dataset(
    point: &ConfigurationPoint,
    dataset: Option<&Dataset>,
) -> Result<std::path::PathBuf, BenchError> {
    dataset.map(|d| d.path.clone()).ok_or_else(|| {
        BenchError::Config(format!(
            "{} needs a dataset but none was provisioned",
            point.algorithm.name
        ))
    })
}

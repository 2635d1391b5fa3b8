//! Configuration matrix builder.
//!
//! Expands the selected algorithms, requested sizes and maximum process count
//! into the ordered list of configuration points the pipeline executes.

use crate::catalog::{AlgorithmSpec, InputMode};
use crate::constants::{DEFAULT_MAX_PROCS, DEFAULT_SIZES, DEFAULT_TRIALS};
use crate::error::BenchError;

/// Smallest power of two greater than or equal to `n` (1 for `n == 0`).
///
/// # Example
/// ```
/// use parbench_core::matrix::next_power_of_two;
///
/// assert_eq!(next_power_of_two(1_000_000), 1_048_576);
/// assert_eq!(next_power_of_two(1024), 1024);
/// ```
#[must_use]
pub fn next_power_of_two(n: u64) -> u64 {
    n.max(1).next_power_of_two()
}

/// Problem size actually handed to the worker for a requested size.
#[must_use]
pub fn effective_size(spec: &AlgorithmSpec, requested: u64) -> u64 {
    match spec.input_mode() {
        InputMode::Dataset => next_power_of_two(requested),
        InputMode::Parameters => requested,
    }
}

/// Process counts to test for an algorithm, ascending and deduplicated.
///
/// Restricted algorithms get every power of two not exceeding `max_procs`,
/// the others get `1..=max_procs`.
#[must_use]
pub fn process_counts(spec: &AlgorithmSpec, max_procs: u32) -> Vec<u32> {
    if spec.power_of_two_only {
        std::iter::successors(Some(1u32), |p| p.checked_mul(2))
            .take_while(|&p| p <= max_procs)
            .collect()
    } else {
        (1..=max_procs).collect()
    }
}

/// One (algorithm, effective size, process count) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationPoint {
    pub algorithm: AlgorithmSpec,
    /// Size as given on the command line.
    pub requested_size: u64,
    /// Size after padding.
    pub size: u64,
    pub processes: u32,
}

/// All process counts planned for one (algorithm, effective size).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPlan {
    pub algorithm: AlgorithmSpec,
    pub requested_size: u64,
    pub size: u64,
    pub process_counts: Vec<u32>,
}

impl SeriesPlan {
    /// Configuration points of this series in execution order.
    pub fn points(&self) -> impl Iterator<Item = ConfigurationPoint> + '_ {
        self.process_counts.iter().map(|&processes| ConfigurationPoint {
            algorithm: self.algorithm,
            requested_size: self.requested_size,
            size: self.size,
            processes,
        })
    }
}

/// Everything the pipeline needs to know about what to run.
#[derive(Debug, Clone)]
pub struct ExperimentPlan {
    pub algorithms: Vec<AlgorithmSpec>,
    pub sizes: Vec<u64>,
    pub max_procs: u32,
    pub trials: u32,
}

impl ExperimentPlan {
    /// Plan over the given algorithms with default sizes, process cap and trials.
    #[must_use]
    pub fn new(algorithms: Vec<AlgorithmSpec>) -> Self {
        Self {
            algorithms,
            sizes: DEFAULT_SIZES.to_vec(),
            max_procs: DEFAULT_MAX_PROCS,
            trials: DEFAULT_TRIALS,
        }
    }

    /// Reject plans that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.algorithms.is_empty() {
            return Err(BenchError::Config("no algorithm selected".into()));
        }
        if self.sizes.is_empty() {
            return Err(BenchError::Config("at least one problem size is required".into()));
        }
        if let Some(bad) = self.sizes.iter().find(|&&s| s == 0) {
            return Err(BenchError::Config(format!("problem size must be positive, got {bad}")));
        }
        if self.max_procs == 0 {
            return Err(BenchError::Config("max process count must be at least 1".into()));
        }
        if self.trials == 0 {
            return Err(BenchError::Config("trial count must be at least 1".into()));
        }
        Ok(())
    }

    /// One entry per (algorithm, effective size), in execution order.
    ///
    /// Requested sizes that pad to an already planned effective size are
    /// skipped so every series is measured once.
    #[must_use]
    pub fn series(&self) -> Vec<SeriesPlan> {
        let mut out = Vec::new();
        for spec in &self.algorithms {
            let counts = process_counts(spec, self.max_procs);
            let mut seen: Vec<u64> = Vec::new();
            for &requested in &self.sizes {
                let size = effective_size(spec, requested);
                if seen.contains(&size) {
                    tracing::debug!(
                        algorithm = spec.name,
                        requested,
                        size,
                        "size already planned, skipping"
                    );
                    continue;
                }
                seen.push(size);
                out.push(SeriesPlan {
                    algorithm: *spec,
                    requested_size: requested,
                    size,
                    process_counts: counts.clone(),
                });
            }
        }
        out
    }

    /// Total number of worker invocations the plan will make.
    #[must_use]
    pub fn total_trials(&self) -> u64 {
        let points: usize = self.series().iter().map(|s| s.process_counts.len()).sum();
        points as u64 * u64::from(self.trials)
    }
}

/// Flatten a plan into its configuration points.
#[must_use]
pub fn build_matrix(plan: &ExperimentPlan) -> Vec<ConfigurationPoint> {
    plan.series()
        .iter()
        .flat_map(|s| s.points().collect::<Vec<_>>())
        .collect()
}

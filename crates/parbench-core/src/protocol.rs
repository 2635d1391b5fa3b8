//! Worker stdin protocol.
//!
//! The worker reads newline-separated answers to its menu prompts: the
//! algorithm token, the algorithm's arguments, then the terminator.

use std::path::PathBuf;

use crate::catalog::{AlgorithmSpec, Workload};
use crate::constants::TERMINATOR_TOKEN;
use crate::error::BenchError;

/// Arguments for one worker request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerArgs {
    Search { dataset: PathBuf, target: u64 },
    PrimeRange { lower: u64, upper: u64 },
    Sort { dataset: PathBuf },
}

impl WorkerArgs {
    /// Workload this argument set belongs to.
    #[must_use]
    pub fn workload(&self) -> Workload {
        match self {
            Self::Search { .. } => Workload::Search,
            Self::PrimeRange { .. } => Workload::PrimeRange,
            Self::Sort { .. } => Workload::Sort,
        }
    }
}

/// A fully-formed request: which algorithm, with which arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRequest {
    pub token: &'static str,
    pub args: WorkerArgs,
}

impl WorkerRequest {
    /// Pair an algorithm with arguments, checking the shapes agree.
    pub fn new(spec: &AlgorithmSpec, args: WorkerArgs) -> Result<Self, BenchError> {
        if args.workload() != spec.workload {
            return Err(BenchError::Config(format!(
                "{} expects {:?} arguments, got {:?}",
                spec.name,
                spec.workload,
                args.workload()
            )));
        }
        Ok(Self {
            token: spec.token,
            args,
        })
    }

    /// Protocol lines, in the order the worker prompts for them.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.token.to_string()];
        match &self.args {
            WorkerArgs::Search { dataset, target } => {
                lines.push(dataset.display().to_string());
                lines.push(target.to_string());
            }
            WorkerArgs::PrimeRange { lower, upper } => {
                lines.push(lower.to_string());
                lines.push(upper.to_string());
            }
            WorkerArgs::Sort { dataset } => {
                lines.push(dataset.display().to_string());
            }
        }
        lines.push(TERMINATOR_TOKEN.to_string());
        lines
    }

    /// The stdin script, newline terminated.
    #[must_use]
    pub fn script(&self) -> String {
        let mut script = self.lines().join("\n");
        script.push('\n');
        script
    }
}

//! Error taxonomy for a benchmark run.
//!
//! Every variant is fatal: the pipeline stops at the first error and the
//! binary maps the variant to an exit code.

use std::fmt;
use std::time::Duration;

/// Identifies one worker invocation inside the configuration matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialContext {
    /// Display name of the algorithm.
    pub algorithm: String,
    /// Effective (possibly padded) problem size.
    pub size: u64,
    /// Requested degree of parallelism.
    pub processes: u32,
    /// Zero-based trial index.
    pub trial: u32,
}

impl fmt::Display for TrialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (size={}, p={}, trial {})",
            self.algorithm,
            self.size,
            self.processes,
            self.trial + 1
        )
    }
}

/// Errors raised by the benchmark pipeline.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The worker could not be compiled or prepared.
    #[error("worker build failed: {message}\n{stderr}")]
    Build { message: String, stderr: String },

    /// The worker process could not be started.
    #[error("failed to spawn worker for {context}: {source}")]
    Spawn {
        context: TrialContext,
        #[source]
        source: std::io::Error,
    },

    /// The worker exited unsuccessfully.
    #[error("worker failed for {context} with {status}\nstderr:\n{stderr}")]
    Execution {
        context: TrialContext,
        status: String,
        stderr: String,
    },

    /// The worker did not exit before the deadline.
    #[error("worker timed out after {limit:?} for {context}")]
    Timeout {
        context: TrialContext,
        limit: Duration,
    },

    /// The worker's output carried no timing line.
    #[error("could not parse time from output of {context}:\n{output}")]
    Parse {
        context: TrialContext,
        output: String,
    },

    /// Speedup was requested for a size that never ran on one process.
    #[error("no single-process baseline for {algorithm} at size {size}")]
    BaselineMissing { algorithm: String, size: u64 },

    /// A dataset could not be generated or persisted.
    #[error("dataset provisioning failed for {path}: {source}")]
    Provision {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid plan or command-line configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A report artifact could not be written.
    #[error("report error: {0}")]
    Report(String),

    /// The run was cancelled.
    #[error("run cancelled")]
    Cancelled,
}

impl BenchError {
    /// The trial at which the error occurred, if it is tied to one.
    #[must_use]
    pub fn context(&self) -> Option<&TrialContext> {
        match self {
            Self::Spawn { context, .. }
            | Self::Execution { context, .. }
            | Self::Timeout { context, .. }
            | Self::Parse { context, .. } => Some(context),
            _ => None,
        }
    }
}

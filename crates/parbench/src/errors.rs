//! Error handling and exit codes.

use parbench_core::constants::exit_codes;
use parbench_core::error::BenchError;

/// Exit code for a benchmark error.
#[must_use]
pub fn handle_error(err: &BenchError) -> i32 {
    match err {
        BenchError::Build { .. } => exit_codes::ERROR_BUILD,
        BenchError::Spawn { .. } | BenchError::Execution { .. } => exit_codes::ERROR_EXECUTION,
        BenchError::Timeout { .. } => exit_codes::ERROR_TIMEOUT,
        BenchError::Parse { .. } => exit_codes::ERROR_PARSE,
        BenchError::BaselineMissing { .. } => exit_codes::ERROR_BASELINE,
        BenchError::Config(_) => exit_codes::ERROR_CONFIG,
        BenchError::Cancelled => exit_codes::ERROR_CANCELED,
        BenchError::Provision { .. } | BenchError::Report(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for an application error, from the first [`BenchError`] in its chain.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<BenchError>())
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}

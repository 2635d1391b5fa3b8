//! Defaults for the experiment plan and the worker protocol.

/// Problem sizes exercised when none are given.
pub const DEFAULT_SIZES: [u64; 4] = [1_000, 10_000, 100_000, 1_000_000];

/// Highest process count requested from the worker by default.
pub const DEFAULT_MAX_PROCS: u32 = 6;

/// Worker invocations per configuration point.
pub const DEFAULT_TRIALS: u32 = 5;

/// Marker preceding the elapsed seconds on the worker's stdout.
pub const DEFAULT_TIMING_MARKER: &str = "Time Taken";

/// Answer to the worker's "run another algorithm?" prompt that ends the session.
pub const TERMINATOR_TOKEN: &str = "N";

/// Seed used for datasets and search targets when none is supplied.
pub const DEFAULT_SEED: u64 = 0x5EED_0F_BE7C;

/// Default worker executable.
pub const DEFAULT_WORKER: &str = "./parallel_computation.o";

/// Default launcher used to start `p` worker processes.
pub const DEFAULT_LAUNCHER: &str = "mpirun";

/// Flag passed to the launcher before the process count.
pub const DEFAULT_NP_FLAG: &str = "-np";

/// Directory holding generated datasets.
pub const DEFAULT_INPUT_DIR: &str = "docs/input";

/// Directory receiving chart images.
pub const DEFAULT_OUTPUT_DIR: &str = "docs/imgs";

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error (I/O, provisioning, rendering).
    pub const ERROR_GENERIC: i32 = 1;
    /// A worker invocation exceeded its deadline.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Worker output had no timing line.
    pub const ERROR_PARSE: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// The worker could not be built.
    pub const ERROR_BUILD: i32 = 5;
    /// The worker could not be spawned or exited non-zero.
    pub const ERROR_EXECUTION: i32 = 6;
    /// Speedup requested without a single-process measurement.
    pub const ERROR_BASELINE: i32 = 7;
    /// Run cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sizes_ascending() {
        assert!(DEFAULT_SIZES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn exit_codes_distinct() {
        let codes = [
            exit_codes::SUCCESS,
            exit_codes::ERROR_GENERIC,
            exit_codes::ERROR_TIMEOUT,
            exit_codes::ERROR_PARSE,
            exit_codes::ERROR_CONFIG,
            exit_codes::ERROR_BUILD,
            exit_codes::ERROR_EXECUTION,
            exit_codes::ERROR_BASELINE,
            exit_codes::ERROR_CANCELED,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

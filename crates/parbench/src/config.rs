//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use parbench_core::catalog::select;
use parbench_core::constants::{
    DEFAULT_INPUT_DIR, DEFAULT_LAUNCHER, DEFAULT_MAX_PROCS, DEFAULT_NP_FLAG, DEFAULT_OUTPUT_DIR,
    DEFAULT_SEED, DEFAULT_TIMING_MARKER, DEFAULT_TRIALS, DEFAULT_WORKER,
};
use parbench_core::error::BenchError;
use parbench_core::matrix::ExperimentPlan;
use parbench_orchestration::worker::LaunchCommand;

/// parbench: benchmark an MPI worker across process counts and problem sizes,
/// then chart its speedup and efficiency.
#[derive(Parser, Debug)]
#[command(name = "parbench", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Worker executable handed to the launcher.
    #[arg(long, default_value = DEFAULT_WORKER, env = "PARBENCH_WORKER")]
    pub worker: PathBuf,

    /// Program that starts the worker with a given process count.
    #[arg(long, default_value = DEFAULT_LAUNCHER, env = "PARBENCH_LAUNCHER")]
    pub launcher: String,

    /// Extra launcher argument placed before the process-count flag (repeatable).
    #[arg(long = "launcher-arg", allow_hyphen_values = true)]
    pub launcher_args: Vec<String>,

    /// Launcher flag preceding the process count.
    #[arg(
        long,
        default_value = DEFAULT_NP_FLAG,
        allow_hyphen_values = true,
        env = "PARBENCH_NP_FLAG"
    )]
    pub np_flag: String,

    /// Problem sizes, comma separated.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "1000,10000,100000,1000000",
        env = "PARBENCH_SIZES"
    )]
    pub sizes: Vec<u64>,

    /// Highest process count to request.
    #[arg(long, default_value_t = DEFAULT_MAX_PROCS, env = "PARBENCH_MAX_PROCS")]
    pub max_procs: u32,

    /// Worker invocations averaged per configuration point.
    #[arg(long, default_value_t = DEFAULT_TRIALS, env = "PARBENCH_TRIALS")]
    pub trials: u32,

    /// Algorithms to run: all, quick-search, prime, bitonic, radix, sample.
    #[arg(long, value_delimiter = ',', default_value = "all", env = "PARBENCH_ALGO")]
    pub algo: Vec<String>,

    /// Text preceding the elapsed seconds in the worker's output.
    #[arg(long, default_value = DEFAULT_TIMING_MARKER, env = "PARBENCH_MARKER")]
    pub marker: String,

    /// Per-invocation timeout (e.g. "30s", "5m", "500ms"); "0" or "none" disables it.
    #[arg(long, default_value = "10m", env = "PARBENCH_TIMEOUT")]
    pub timeout: String,

    /// Directory for generated datasets.
    #[arg(long, default_value = DEFAULT_INPUT_DIR, env = "PARBENCH_INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory for chart images.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, env = "PARBENCH_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Script run with bash before any experiment, typically compiling the worker.
    #[arg(long, env = "PARBENCH_BUILD_SCRIPT")]
    pub build_script: Option<PathBuf>,

    /// Seed for datasets and search targets.
    #[arg(long, default_value_t = DEFAULT_SEED, env = "PARBENCH_SEED")]
    pub seed: u64,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Skip chart rendering.
    #[arg(long)]
    pub no_charts: bool,

    /// Print the configuration matrix and exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (tab-separated results only).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse the timeout flag; `None` means no deadline.
    pub fn timeout_duration(&self) -> Result<Option<Duration>, BenchError> {
        let s = self.timeout.trim();
        if s.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        let d = parse_duration(s)
            .ok_or_else(|| BenchError::Config(format!("invalid timeout: {:?}", self.timeout)))?;
        Ok((!d.is_zero()).then_some(d))
    }

    /// Validated experiment plan.
    pub fn to_plan(&self) -> Result<ExperimentPlan, BenchError> {
        if self.marker.trim().is_empty() {
            return Err(BenchError::Config("timing marker must not be empty".into()));
        }
        let plan = ExperimentPlan {
            algorithms: select(&self.algo)?,
            sizes: self.sizes.clone(),
            max_procs: self.max_procs,
            trials: self.trials,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Command used to start each worker invocation.
    #[must_use]
    pub fn launch_command(&self) -> LaunchCommand {
        LaunchCommand {
            launcher: self.launcher.clone(),
            launcher_args: self.launcher_args.clone(),
            np_flag: self.np_flag.clone(),
            worker: self.worker.clone(),
        }
    }
}

/// Parse a duration string like "5m", "1h", "30s".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("parbench").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn parse_duration_formats() {
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("45"), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn defaults() {
        let c = config(&[]);
        assert_eq!(c.sizes, [1000, 10_000, 100_000, 1_000_000]);
        assert_eq!(c.max_procs, 6);
        assert_eq!(c.trials, 5);
        assert_eq!(c.marker, "Time Taken");
        assert_eq!(c.timeout_duration().unwrap(), Some(Duration::from_secs(600)));

        let plan = c.to_plan().unwrap();
        assert_eq!(plan.algorithms.len(), 5);

        let cmd = c.launch_command();
        assert_eq!(cmd.describe(2), "mpirun -np 2 ./parallel_computation.o");
    }

    #[test]
    fn timeout_can_be_disabled() {
        assert_eq!(config(&["--timeout", "0"]).timeout_duration().unwrap(), None);
        assert_eq!(config(&["--timeout", "none"]).timeout_duration().unwrap(), None);
        assert!(config(&["--timeout", "later"]).timeout_duration().is_err());
    }

    #[test]
    fn lists_and_repeats() {
        let c = config(&[
            "--sizes",
            "16,32",
            "--algo",
            "radix,bitonic",
            "--algo",
            "prime",
            "--launcher-arg",
            "--oversubscribe",
            "--np-flag",
            "-n",
        ]);
        assert_eq!(c.sizes, [16, 32]);
        let plan = c.to_plan().unwrap();
        let keys: Vec<_> = plan.algorithms.iter().map(|a| a.key).collect();
        assert_eq!(keys, ["prime", "bitonic", "radix"]);
        assert_eq!(
            c.launch_command().args(4),
            ["--oversubscribe", "-n", "4", "./parallel_computation.o"]
        );
    }

    #[test]
    fn invalid_plans_are_config_errors() {
        for args in [
            &["--algo", "heap"][..],
            &["--trials", "0"],
            &["--max-procs", "0"],
            &["--sizes", "0"],
            &["--marker", " "],
        ] {
            assert!(
                matches!(config(args).to_plan(), Err(BenchError::Config(_))),
                "{args:?} should be rejected"
            );
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(AppConfig::try_parse_from(["parbench", "-q", "-v"]).is_err());
    }
}

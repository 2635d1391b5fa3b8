//! JSON run summary (serializable).

use std::path::Path;

use serde::{Deserialize, Serialize};

use parbench_core::error::BenchError;
use parbench_core::stats::{DerivedSeries, SeriesPoint};

/// Current summary format version.
pub const SUMMARY_VERSION: u32 = 1;

/// Everything measured by one run, plus the host it ran on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Summary format version.
    pub version: u32,
    /// CPU model of the host.
    pub cpu_model: String,
    /// Number of CPU cores available to the harness.
    pub num_cores: usize,
    /// Run timestamp.
    pub timestamp: String,
    /// Worker invocations averaged per configuration point.
    pub trials: u32,
    pub series: Vec<SeriesSummary>,
}

/// One (algorithm, effective size) series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub algorithm: String,
    pub token: String,
    pub size: u64,
    pub power_of_two_only: bool,
    pub points: Vec<PointSummary>,
}

/// One process count. Ratios that are not finite are written as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSummary {
    pub processes: u32,
    pub mean_seconds: f64,
    pub speedup: Option<f64>,
    pub efficiency: Option<f64>,
}

impl From<&SeriesPoint> for PointSummary {
    fn from(point: &SeriesPoint) -> Self {
        let finite = |v: f64| v.is_finite().then_some(v);
        Self {
            processes: point.processes,
            mean_seconds: point.mean_seconds,
            speedup: finite(point.speedup),
            efficiency: finite(point.efficiency),
        }
    }
}

impl From<&DerivedSeries> for SeriesSummary {
    fn from(series: &DerivedSeries) -> Self {
        Self {
            algorithm: series.algorithm.name.to_string(),
            token: series.algorithm.token.to_string(),
            size: series.size,
            power_of_two_only: series.algorithm.power_of_two_only,
            points: series.points.iter().map(PointSummary::from).collect(),
        }
    }
}

impl RunSummary {
    /// Summary of `series` stamped with the current host and time.
    #[must_use]
    pub fn new(series: &[DerivedSeries], trials: u32) -> Self {
        Self {
            version: SUMMARY_VERSION,
            cpu_model: cpu_model(),
            num_cores: num_cpus(),
            timestamp: current_timestamp(),
            trials,
            series: series.iter().map(SeriesSummary::from).collect(),
        }
    }

    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version == SUMMARY_VERSION
    }
}

/// Write the summary as pretty JSON, creating parent directories.
pub fn save_summary(summary: &RunSummary, path: &Path) -> Result<(), BenchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| summary_err(path, &e))?;
    }
    let content = serde_json::to_string_pretty(summary).map_err(|e| summary_err(path, &e))?;
    std::fs::write(path, content).map_err(|e| summary_err(path, &e))?;
    tracing::info!(path = %path.display(), "run summary saved");
    Ok(())
}

/// Read a summary written by [`save_summary`].
pub fn load_summary(path: &Path) -> Result<RunSummary, BenchError> {
    let content = std::fs::read_to_string(path).map_err(|e| summary_err(path, &e))?;
    serde_json::from_str(&content).map_err(|e| summary_err(path, &e))
}

fn summary_err(path: &Path, e: &dyn std::fmt::Display) -> BenchError {
    BenchError::Report(format!("run summary {}: {e}", path.display()))
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(1)
}

/// Get the current CPU model string.
#[must_use]
pub fn cpu_model() -> String {
    use sysinfo::System;
    let sys = System::new_all();
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .unwrap_or_default()
}

/// Seconds since the Unix epoch, prefixed `unix:`.
#[must_use]
pub fn current_timestamp() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("unix:{}", dur.as_secs())
}

//! Statistics aggregation: per-point means, then speedup and efficiency.
//!
//! Speedup is `mean(1) / mean(p)` and efficiency is `speedup / p`. Neither
//! is clamped; super-linear speedup and slow-downs are reported as measured.

use std::collections::BTreeMap;

use crate::catalog::AlgorithmSpec;
use crate::error::BenchError;
use crate::matrix::ConfigurationPoint;

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// One process count of a derived series.
/// A zero mean time yields an infinite speedup and efficiency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub processes: u32,
    pub mean_seconds: f64,
    pub speedup: f64,
    pub efficiency: f64,
}

/// Mean durations for one (algorithm, effective size), keyed by process count.
#[derive(Debug, Clone)]
pub struct AggregatedSeries {
    pub algorithm: AlgorithmSpec,
    pub size: u64,
    means: BTreeMap<u32, f64>,
}

impl AggregatedSeries {
    #[must_use]
    pub fn new(algorithm: AlgorithmSpec, size: u64) -> Self {
        Self {
            algorithm,
            size,
            means: BTreeMap::new(),
        }
    }

    /// Reduce the trial durations for `processes` to their mean and store it.
    pub fn record(&mut self, processes: u32, durations: &[f64]) -> Result<f64, BenchError> {
        let avg = mean(durations).ok_or_else(|| {
            BenchError::Config(format!(
                "no trial durations for {} at size {} with p={processes}",
                self.algorithm.name, self.size
            ))
        })?;
        self.means.insert(processes, avg);
        Ok(avg)
    }

    /// Mean durations in ascending process-count order.
    #[must_use]
    pub fn means(&self) -> &BTreeMap<u32, f64> {
        &self.means
    }

    /// Measured process counts, ascending.
    #[must_use]
    pub fn process_counts(&self) -> Vec<u32> {
        self.means.keys().copied().collect()
    }

    /// Single-process mean duration.
    pub fn baseline(&self) -> Result<f64, BenchError> {
        self.means
            .get(&1)
            .copied()
            .ok_or_else(|| BenchError::BaselineMissing {
                algorithm: self.algorithm.name.to_string(),
                size: self.size,
            })
    }

    /// Speedup and efficiency for every measured process count.
    pub fn derive(&self) -> Result<DerivedSeries, BenchError> {
        let t1 = self.baseline()?;
        let points = self
            .means
            .iter()
            .map(|(&p, &t)| {
                let speedup = t1 / t;
                SeriesPoint {
                    processes: p,
                    mean_seconds: t,
                    speedup,
                    efficiency: speedup / f64::from(p),
                }
            })
            .collect();
        Ok(DerivedSeries {
            algorithm: self.algorithm,
            size: self.size,
            points,
        })
    }
}

/// A series with speedup and efficiency filled in, ready for reporting.
#[derive(Debug, Clone)]
pub struct DerivedSeries {
    pub algorithm: AlgorithmSpec,
    pub size: u64,
    /// Ascending by process count.
    pub points: Vec<SeriesPoint>,
}

impl DerivedSeries {
    #[must_use]
    pub fn process_counts(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.processes).collect()
    }
}

/// All aggregated series of a run, passed explicitly through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ResultsContext {
    series: Vec<AggregatedSeries>,
}

impl ResultsContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the trial durations of one configuration point.
    pub fn record(
        &mut self,
        point: &ConfigurationPoint,
        durations: &[f64],
    ) -> Result<f64, BenchError> {
        self.series_mut(point.algorithm, point.size)
            .record(point.processes, durations)
    }

    /// Series for (algorithm, size), created on first use.
    pub fn series_mut(&mut self, algorithm: AlgorithmSpec, size: u64) -> &mut AggregatedSeries {
        let idx = match self
            .series
            .iter()
            .position(|s| s.algorithm.token == algorithm.token && s.size == size)
        {
            Some(idx) => idx,
            None => {
                self.series.push(AggregatedSeries::new(algorithm, size));
                self.series.len() - 1
            }
        };
        &mut self.series[idx]
    }

    /// Series for a protocol token and effective size.
    #[must_use]
    pub fn get(&self, token: &str, size: u64) -> Option<&AggregatedSeries> {
        self.series
            .iter()
            .find(|s| s.algorithm.token == token && s.size == size)
    }

    /// Series in the order they were first recorded.
    pub fn iter(&self) -> impl Iterator<Item = &AggregatedSeries> {
        self.series.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Derive every series, failing on the first one without a baseline.
    pub fn derive_all(&self) -> Result<Vec<DerivedSeries>, BenchError> {
        self.series.iter().map(AggregatedSeries::derive).collect()
    }
}

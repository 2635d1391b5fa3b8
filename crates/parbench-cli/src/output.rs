//! Terminal output formatting.

use std::fmt::Write as _;
use std::time::Duration;

use parbench_core::matrix::SeriesPlan;
use parbench_core::stats::DerivedSeries;

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a measured number of seconds.
#[must_use]
pub fn format_seconds(secs: f64) -> String {
    Duration::try_from_secs_f64(secs).map_or_else(|_| format!("{secs}s"), format_duration)
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Header line for a series.
#[must_use]
pub fn series_title(series: &DerivedSeries) -> String {
    format!("{} (N = {})", series.algorithm.name, format_number(series.size))
}

/// Plain-text table of one series: process count, mean time, speedup and
/// efficiency, one row per process count.
#[must_use]
pub fn format_series_table(series: &DerivedSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>5}  {:>12}  {:>9}  {:>10}",
        "p", "mean", "speedup", "efficiency"
    );
    let _ = writeln!(out, "  {:-<5}  {:-<12}  {:-<9}  {:-<10}", "", "", "", "");
    for point in &series.points {
        let _ = writeln!(
            out,
            "  {:>5}  {:>12}  {:>9.3}  {:>9.1}%",
            point.processes,
            format_seconds(point.mean_seconds),
            point.speedup,
            point.efficiency * 100.0
        );
    }
    out
}

/// Plain-text listing of the configuration matrix.
#[must_use]
pub fn format_matrix(series: &[SeriesPlan]) -> String {
    let mut out = String::new();
    for s in series {
        let padded = if s.size == s.requested_size {
            String::new()
        } else {
            format!(" (requested {})", format_number(s.requested_size))
        };
        let counts: Vec<String> = s.process_counts.iter().map(u32::to_string).collect();
        let _ = writeln!(
            out,
            "  {:<22} N = {:>11}{padded}  p = [{}]",
            s.algorithm.name,
            format_number(s.size),
            counts.join(", ")
        );
    }
    out
}

//! Timing extraction from worker output.

use crate::constants::DEFAULT_TIMING_MARKER;
use crate::error::{BenchError, TrialContext};

/// Scans worker output for `<marker>: <seconds>`.
#[derive(Debug, Clone)]
pub struct TimingExtractor {
    marker: String,
}

impl TimingExtractor {
    /// Extractor looking for `marker`.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Marker this extractor looks for.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Duration in seconds from the first matching line, if any.
    ///
    /// A line matches when it contains the marker followed by optional
    /// whitespace, a colon, optional whitespace and a non-negative decimal.
    /// Later matches are ignored; a worker printing several is suspect, so
    /// they are counted and logged.
    #[must_use]
    pub fn extract(&self, output: &str) -> Option<f64> {
        let mut matches = output.lines().filter_map(|line| self.parse_line(line));
        let first = matches.next()?;
        let extra = matches.count();
        if extra > 0 {
            tracing::debug!(extra, marker = %self.marker, "ignoring additional timing lines");
        }
        Some(first)
    }

    /// Like [`extract`](Self::extract), failing with the full output when
    /// no line matches.
    pub fn require(&self, output: &str, context: &TrialContext) -> Result<f64, BenchError> {
        self.extract(output).ok_or_else(|| BenchError::Parse {
            context: context.clone(),
            output: output.to_string(),
        })
    }

    fn parse_line(&self, line: &str) -> Option<f64> {
        // a marker occurrence without a number does not end the search on this line
        line.match_indices(self.marker.as_str()).find_map(|(idx, _)| {
            let rest = line[idx + self.marker.len()..].trim_start();
            let rest = rest.strip_prefix(':')?.trim_start();
            leading_decimal(rest)
        })
    }
}

impl Default for TimingExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMING_MARKER)
    }
}

/// Parse `[0-9]*\.?[0-9]+` at the start of `s`.
fn leading_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let int_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let mut end = int_len;
    if bytes.get(end) == Some(&b'.') {
        let frac_len = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if frac_len > 0 {
            end += 1 + frac_len;
        }
    }
    if end == 0 {
        return None;
    }
    s[..end].parse().ok().filter(|v: &f64| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKER_OUTPUT: &str = "\
Running on 4 processes.
Radix Sort Selected
--- Performance Analysis for Radix Sort ---
Data Size / Range: 1024 elements/items
Number of Processes: 4
Time Taken: 0.012345 seconds (12.345000 ms)
--------------------------------------------------
Want to try another algorithm? (Y/N): Exiting program.
";

    #[test]
    fn extracts_worker_timing() {
        let ex = TimingExtractor::default();
        assert_eq!(ex.extract(WORKER_OUTPUT), Some(0.012_345));
    }

    #[test]
    fn missing_marker() {
        let ex = TimingExtractor::default();
        assert_eq!(ex.extract("Result: Found 168 primes\n"), None);
        assert_eq!(ex.extract(""), None);
    }

    #[test]
    fn first_match_wins() {
        let ex = TimingExtractor::default();
        let out = "Time Taken: 1.5 seconds\nTime Taken: 9.0 seconds\n";
        assert_eq!(ex.extract(out), Some(1.5));
    }

    #[test]
    fn marker_without_number_is_skipped() {
        let ex = TimingExtractor::default();
        let out = "Time Taken: n/a\nTime Taken: 2 seconds\n";
        assert_eq!(ex.extract(out), Some(2.0));
    }

    #[test]
    fn leading_fraction_and_spacing() {
        let ex = TimingExtractor::default();
        assert_eq!(ex.extract("Time Taken:.25"), Some(0.25));
        assert_eq!(ex.extract("  Time Taken :   3.75s"), Some(3.75));
    }

    #[test]
    fn marker_requires_colon() {
        let ex = TimingExtractor::default();
        assert_eq!(ex.extract("Time Taken 3.0"), None);
    }

    #[test]
    fn custom_marker() {
        let ex = TimingExtractor::new("elapsed");
        assert_eq!(ex.extract("elapsed: 0.5\nTime Taken: 1.0"), Some(0.5));
        assert_eq!(ex.marker(), "elapsed");
    }

    #[test]
    fn require_reports_whole_output() {
        let ex = TimingExtractor::default();
        let ctx = TrialContext {
            algorithm: "Sample Sort".into(),
            size: 8,
            processes: 2,
            trial: 0,
        };
        let out = "Result: Sorting produced an empty list or failed.\n";
        match ex.require(out, &ctx) {
            Err(BenchError::Parse { context, output }) => {
                assert_eq!(context, ctx);
                assert_eq!(output, out);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(ex.require(WORKER_OUTPUT, &ctx).unwrap(), 0.012_345);
    }

    #[test]
    fn zero_and_overflowing_timings() {
        let ex = TimingExtractor::default();
        assert_eq!(ex.extract("Time Taken: 0.000000 seconds"), Some(0.0));
        let huge = format!("Time Taken: 1{}\nTime Taken: 4.0", "0".repeat(400));
        assert_eq!(ex.extract(&huge), Some(4.0));
    }

    #[test]
    fn leading_decimal_forms() {
        assert_eq!(leading_decimal("12"), Some(12.0));
        assert_eq!(leading_decimal("12."), Some(12.0));
        assert_eq!(leading_decimal("0.5x"), Some(0.5));
        assert_eq!(leading_decimal(".5"), Some(0.5));
        assert_eq!(leading_decimal("."), None);
        assert_eq!(leading_decimal("-1"), None);
    }
}

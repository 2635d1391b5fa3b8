//! CLI result presenter and progress reporter.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use parbench_core::error::TrialContext;
use parbench_core::matrix::{ConfigurationPoint, ExperimentPlan, SeriesPlan};
use parbench_core::stats::DerivedSeries;
use parbench_orchestration::interfaces::{ProgressReporter, ResultPresenter};

use crate::output::{
    format_matrix, format_number, format_seconds, format_series_table, series_title,
};
use crate::ui::{print_error, print_header, print_success, style_efficiency};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Describe the plan before anything runs.
    pub fn present_plan(&self, plan: &ExperimentPlan, worker: &str) {
        if self.quiet {
            return;
        }
        print_header("parbench");
        let names: Vec<_> = plan.algorithms.iter().map(|a| a.name).collect();
        let sizes: Vec<_> = plan.sizes.iter().map(|&s| format_number(s)).collect();
        println!("Worker:     {worker}");
        println!("Algorithms: {}", names.join(", "));
        println!("Sizes:      {}", sizes.join(", "));
        println!("Max procs:  {}", plan.max_procs);
        println!("Trials:     {}", plan.trials);
        println!("Runs:       {}", format_number(plan.total_trials()));
        println!();
    }

    /// Print the configuration matrix for a dry run.
    pub fn present_matrix(&self, series: &[SeriesPlan], trials: u32) {
        print_header("Configuration matrix");
        print!("{}", format_matrix(series));
        let points: usize = series.iter().map(|s| s.process_counts.len()).sum();
        println!(
            "{} series, {} configuration points, {} trials each",
            series.len(),
            points,
            trials
        );
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_series(&self, series: &DerivedSeries) {
        if self.quiet {
            for p in &series.points {
                println!(
                    "{}\t{}\t{}\t{:.6}\t{:.4}\t{:.4}",
                    series.algorithm.key,
                    series.size,
                    p.processes,
                    p.mean_seconds,
                    p.speedup,
                    p.efficiency
                );
            }
            return;
        }

        print_header(&series_title(series));
        if self.verbose {
            print!("{}", format_series_table(series));
        } else {
            for p in &series.points {
                let figures = format!(
                    "speedup {:.2}x, efficiency {:.0}%",
                    p.speedup,
                    p.efficiency * 100.0
                );
                println!(
                    "  p={:<3} {:>10}  {}",
                    p.processes,
                    format_seconds(p.mean_seconds),
                    style_efficiency(figures, p.efficiency, p.speedup)
                );
            }
        }
        println!();
    }

    fn present_artifacts(&self, paths: &[PathBuf]) {
        if self.quiet || paths.is_empty() {
            return;
        }
        print_success(&format!("{} artifacts written", paths.len()));
        for path in paths {
            println!("  {}", path.display());
        }
    }

    fn present_error(&self, error: &str) {
        print_error(error);
    }
}

/// Progress bar over every worker invocation of the plan.
pub struct CLIProgressReporter {
    bar: ProgressBar,
}

impl CLIProgressReporter {
    /// Visible bar, or a hidden one when `quiet`.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-")),
        );
        Self { bar }
    }
}

impl ProgressReporter for CLIProgressReporter {
    fn on_plan(&self, total_trials: u64) {
        self.bar.set_length(total_trials);
        self.bar.set_position(0);
    }

    fn on_trial(&self, context: &TrialContext, seconds: f64) {
        self.bar
            .set_message(format!("{context}: {}", format_seconds(seconds)));
        self.bar.inc(1);
    }

    fn on_point(&self, point: &ConfigurationPoint, mean_seconds: f64) {
        tracing::debug!(
            algorithm = point.algorithm.name,
            size = point.size,
            processes = point.processes,
            mean_seconds,
            "point averaged"
        );
    }

    fn complete(&self) {
        self.bar.finish_with_message("benchmark complete");
    }
}

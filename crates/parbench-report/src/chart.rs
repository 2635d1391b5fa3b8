//! PNG charts for derived series.
//!
//! Two images per (algorithm, effective size): mean execution time against
//! process count, and speedup with efficiency on a secondary axis. Names are
//! derived from the algorithm slug and the size so a re-run overwrites the
//! previous images.

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use parbench_core::error::BenchError;
use parbench_core::stats::{DerivedSeries, SeriesPoint};

use crate::axis::AxisScale;

/// Image dimensions and colours shared by both charts.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub time_color: RGBColor,
    pub speedup_color: RGBColor,
    pub efficiency_color: RGBColor,
    pub line_width: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            time_color: BLUE,
            speedup_color: RED,
            efficiency_color: RGBColor(0, 128, 0),
            line_width: 2,
        }
    }
}

/// `(time chart, performance chart)` paths for a series.
#[must_use]
pub fn chart_paths(dir: &Path, series: &DerivedSeries) -> (PathBuf, PathBuf) {
    let slug = series.algorithm.slug();
    (
        dir.join(format!("{slug}_time_{}.png", series.size)),
        dir.join(format!("{slug}_perf_{}.png", series.size)),
    )
}

/// Render both charts of `series` into `dir`, returning the written paths.
pub fn render_series(
    series: &DerivedSeries,
    dir: &Path,
    config: &ChartConfig,
) -> Result<Vec<PathBuf>, BenchError> {
    if series.points.is_empty() {
        return Err(BenchError::Report(format!(
            "{} at size {} has no points to plot",
            series.algorithm.name, series.size
        )));
    }
    std::fs::create_dir_all(dir)
        .map_err(|e| BenchError::Report(format!("cannot create {}: {e}", dir.display())))?;

    let (time_path, perf_path) = chart_paths(dir, series);
    let scale = AxisScale::for_algorithm(&series.algorithm);

    draw_time_chart(series, scale, &time_path, config).map_err(|e| chart_err(&time_path, &*e))?;
    tracing::info!(path = %time_path.display(), "time chart saved");

    draw_performance_chart(series, scale, &perf_path, config)
        .map_err(|e| chart_err(&perf_path, &*e))?;
    tracing::info!(path = %perf_path.display(), "performance chart saved");

    Ok(vec![time_path, perf_path])
}

/// Render every series, stopping at the first failure.
pub fn render_all(
    series: &[DerivedSeries],
    dir: &Path,
    config: &ChartConfig,
) -> Result<Vec<PathBuf>, BenchError> {
    let mut written = Vec::with_capacity(series.len() * 2);
    for s in series {
        written.extend(render_series(s, dir, config)?);
    }
    Ok(written)
}

fn draw_time_chart(
    series: &DerivedSeries,
    scale: AxisScale,
    path: &Path,
    config: &ChartConfig,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let counts = series.process_counts();
    let y_top = axis_top(series.points.iter().map(|p| p.mean_seconds), 0.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{}: execution time (N = {})", series.algorithm.name, series.size),
            ("sans-serif", 32),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(scale.range(&counts), 0f64..y_top)?;

    chart
        .configure_mesh()
        .x_desc(scale.describe())
        .y_desc("Mean time (s)")
        .x_labels(counts.len() + 2)
        .x_label_formatter(&|x| scale.label(*x))
        .y_label_formatter(&|y| format!("{y:.4}"))
        .draw()?;

    let points = plotted(series, scale, |p| p.mean_seconds);
    let color = config.time_color;

    chart
        .draw_series(LineSeries::new(
            points.clone(),
            ShapeStyle::from(&color).stroke_width(config.line_width),
        ))?
        .label("Mean time")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_performance_chart(
    series: &DerivedSeries,
    scale: AxisScale,
    path: &Path,
    config: &ChartConfig,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let counts = series.process_counts();
    let x_range = scale.range(&counts);
    let speedup_top = axis_top(series.points.iter().map(|p| p.speedup), 1.0);
    let efficiency_top = axis_top(series.points.iter().map(|p| p.efficiency), 1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "{}: speedup and efficiency (N = {})",
                series.algorithm.name, series.size
            ),
            ("sans-serif", 32),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .right_y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), 0f64..speedup_top)?
        .set_secondary_coord(x_range, 0f64..efficiency_top);

    chart
        .configure_mesh()
        .x_desc(scale.describe())
        .y_desc("Speedup")
        .x_labels(counts.len() + 2)
        .x_label_formatter(&|x| scale.label(*x))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc("Efficiency")
        .y_label_formatter(&|y| format!("{y:.2}"))
        .draw()?;

    let speedup = plotted(series, scale, |p| p.speedup);
    let efficiency = plotted(series, scale, |p| p.efficiency);

    let (speedup_color, efficiency_color) = (config.speedup_color, config.efficiency_color);
    chart
        .draw_series(LineSeries::new(
            speedup,
            ShapeStyle::from(&speedup_color).stroke_width(config.line_width),
        ))?
        .label("Speedup")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &speedup_color));
    chart
        .draw_secondary_series(LineSeries::new(
            efficiency,
            ShapeStyle::from(&efficiency_color).stroke_width(config.line_width),
        ))?
        .label("Efficiency")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &efficiency_color));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Top of a value axis: 10% above the largest finite value, at least `floor`.
///
/// A zero mean time makes speedup infinite; such values stay off the axis.
fn axis_top(values: impl Iterator<Item = f64>, floor: f64) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(floor, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Finite `(position, value)` pairs of a series, in process-count order.
fn plotted(
    series: &DerivedSeries,
    scale: AxisScale,
    value: impl Fn(&SeriesPoint) -> f64,
) -> Vec<(i32, f64)> {
    series
        .points
        .iter()
        .map(|p| (scale.position(p.processes), value(p)))
        .filter(|(_, v)| v.is_finite())
        .collect()
}

fn chart_err(path: &Path, e: &dyn Error) -> BenchError {
    BenchError::Report(format!("failed to draw {}: {e}", path.display()))
}

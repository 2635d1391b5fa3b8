//! # parbench-report
//!
//! Report emitter: per-series time and speedup/efficiency charts rendered
//! with `plotters`, plus an optional JSON run summary.

pub mod axis;
pub mod chart;
pub mod summary;

pub use axis::AxisScale;
pub use chart::{chart_paths, render_all, render_series, ChartConfig};
pub use summary::{load_summary, save_summary, PointSummary, RunSummary, SeriesSummary};

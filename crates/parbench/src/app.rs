//! Application entry point and dispatch.

use anyhow::Result;

use parbench_cli::presenter::{CLIProgressReporter, CLIResultPresenter};
use parbench_core::cancel::CancellationToken;
use parbench_core::provision::DatasetProvisioner;
use parbench_core::timing::TimingExtractor;
use parbench_orchestration::build::run_build_script;
use parbench_orchestration::interfaces::ResultPresenter;
use parbench_orchestration::orchestrator::ExperimentRunner;
use parbench_orchestration::worker::ProcessWorker;
use parbench_report::chart::{render_all, ChartConfig};
use parbench_report::summary::{save_summary, RunSummary};

use crate::config::AppConfig;
use crate::version::full_version;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        parbench_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    let plan = config.to_plan()?;
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);

    if config.dry_run {
        presenter.present_matrix(&plan.series(), plan.trials);
        return Ok(());
    }

    let timeout = config.timeout_duration()?;
    let command = config.launch_command();
    tracing::info!(version = %full_version(), command = %command.template(), "starting run");

    if let Some(script) = &config.build_script {
        run_build_script(script)?;
    }

    let cancel = CancellationToken::new();
    ctrlc_handler(cancel.clone());

    presenter.present_plan(&plan, &command.template());

    let worker = ProcessWorker::new(command)
        .with_timeout(timeout)
        .with_cancellation(cancel.clone());
    let reporter = CLIProgressReporter::new(config.quiet);
    let mut runner = ExperimentRunner::new(
        &worker,
        DatasetProvisioner::new(&config.input_dir, config.seed),
    )
    .with_extractor(TimingExtractor::new(config.marker.as_str()))
    .with_reporter(&reporter)
    .with_cancellation(cancel)
    .with_seed(config.seed);

    let results = runner.run(&plan)?;
    // every baseline is checked before any chart is drawn
    let derived = results.derive_all()?;
    for series in &derived {
        presenter.present_series(series);
    }

    let mut artifacts = Vec::new();
    if !config.no_charts {
        artifacts.extend(render_all(&derived, &config.output_dir, &ChartConfig::default())?);
    }
    if let Some(path) = &config.summary {
        save_summary(&RunSummary::new(&derived, plan.trials), path)?;
        artifacts.push(path.clone());
    }
    presenter.present_artifacts(&artifacts);

    Ok(())
}

fn ctrlc_handler(cancel: CancellationToken) {
    ctrlc::set_handler(move || {
        cancel.cancel();
    })
    .expect("Error setting Ctrl+C handler");
}

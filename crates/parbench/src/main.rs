//! parbench: speedup and efficiency harness for an MPI worker.

use parbench_cli::presenter::CLIResultPresenter;
use parbench_lib::{app, config, errors};
use parbench_orchestration::interfaces::ResultPresenter;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = config::AppConfig::parse();

    let level = if config.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    // RUST_LOG, when set, replaces the default level entirely
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(err) = app::run(&config) {
        CLIResultPresenter::new(config.verbose, config.quiet).present_error(&format!("{err}"));
        std::process::exit(errors::exit_code(&err));
    }
}

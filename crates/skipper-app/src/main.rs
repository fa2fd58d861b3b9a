mod browser;
mod cli;
mod locator;
mod orchestrator;
mod placer;
mod probe;
mod signal;
mod supervisor;

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use skipper_platform::{native_desktop, native_process_tree, Desktop, MonitorRegistry, ProcessTree};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let config = match &args.config {
        Some(path) => skipper_config::load_config_from(Path::new(path)),
        None => skipper_config::load_config(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("skipper: {e}");
            std::process::exit(1);
        }
    };

    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| format!("skipper={}", config.logging.level.as_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "skipper=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("skipper v{} starting", env!("CARGO_PKG_VERSION"));

    let desktop: Arc<dyn Desktop> = Arc::from(native_desktop());
    let tree: Arc<dyn ProcessTree> = Arc::new(native_process_tree());

    if args.print_monitors {
        match MonitorRegistry::snapshot(desktop.as_ref()) {
            Ok(registry) => {
                for monitor in registry.monitors() {
                    println!(
                        "{}: {}{}",
                        monitor.index,
                        monitor.bounds,
                        if monitor.is_primary { " primary" } else { "" }
                    );
                }
            }
            Err(e) => {
                eprintln!("skipper: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let token = CancellationToken::new();
    tokio::spawn(signal::wait_for_shutdown_signal(token.clone()));

    let mut orchestrator =
        orchestrator::Orchestrator::new(config, desktop, tree, token).with_skip_viewer(args.skip_viewer);

    if let Err(e) = orchestrator.run().await {
        tracing::error!("startup failed: {e}");
        std::process::exit(1);
    }
    if orchestrator.degraded_start() {
        tracing::info!("note: the service never became ready during this run");
    }
    tracing::info!("shutdown complete");
}

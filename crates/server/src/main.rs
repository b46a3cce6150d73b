mod api;
mod background;
mod cli;
mod router;
mod startup;
mod state;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};

use taskscheduler_core::{logging, Config};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    cli.apply(&mut config);
    config.validate()?;

    let _log_guard = logging::init(&config.logging)?;
    if !cli.config.exists() {
        warn!("Config file {} not found, using defaults", cli.config.display());
    }
    config.log_summary();

    let state = startup::build_app_state(&config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ping_worker = background::spawn_ping_worker(
        state.clone(),
        config.worker.ping_sites.clone(),
        Duration::from_millis(config.worker.interval_ms),
        shutdown_rx,
    );

    let app = router::build_router(state.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    shutdown_tx.send(true).ok();
    if let Some(handle) = ping_worker {
        handle.await.ok();
    }
    let stats = state.scheduler.stats();
    info!(
        pending = stats.pending,
        running = stats.running,
        done = stats.done,
        failed = stats.failed,
        "final task counts"
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                warn!("failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }

    info!("shutdown signal received");
}

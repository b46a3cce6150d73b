//! Server startup: shared state initialization.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use taskscheduler_core::Config;
use taskscheduler_scheduler::Scheduler;
use taskscheduler_tasks::ProbeSettings;

use crate::state::AppState;

/// Build `AppState` from a validated config. Must run inside the Tokio runtime.
pub fn build_app_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let scheduler = Scheduler::new(config.scheduler.max_concurrent_tasks)?;
    info!(
        "Scheduler ready (max_concurrent_tasks: {})",
        scheduler.limit()
    );

    let probes = ProbeSettings::from_config(&config.tasks);
    let http_client = probes.http_client()?;

    Ok(Arc::new(AppState {
        scheduler: Arc::new(scheduler),
        probes,
        http_client,
        request_timeout: Duration::from_secs(config.server.timeout_secs),
    }))
}

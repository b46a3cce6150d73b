use std::sync::Arc;
use std::time::Duration;

use taskscheduler_scheduler::Scheduler;
use taskscheduler_tasks::ProbeSettings;

/// Shared state handed to every handler and the background ping worker.
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    pub probes: ProbeSettings,
    /// One pooled client for every HTTP probe.
    pub http_client: reqwest::Client,
    /// Deadline for a whole HTTP request to this server.
    pub request_timeout: Duration,
}

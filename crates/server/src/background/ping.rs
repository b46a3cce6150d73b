//! Periodic ping driver: submits one ping per configured site on every tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use taskscheduler_tasks::PingTask;

use crate::state::AppState;

/// Spawn the ping worker, or return `None` when there is nothing to ping.
///
/// Submissions are fire-and-forget; the worker never waits on earlier tasks.
/// It stops when `shutdown` flips to `true` or its sender is dropped.
pub(crate) fn spawn_ping_worker(
    state: Arc<AppState>,
    sites: Vec<String>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    if sites.is_empty() {
        info!("Ping worker disabled (no ping sites configured)");
        return None;
    }
    info!("Ping worker started: {} sites every {:?}", sites.len(), every);

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; start submitting one period in.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    for site in &sites {
                        let id = state.scheduler.submit(PingTask::new(site.as_str(), &state.probes));
                        debug!(task_id = %id, site = %site, "periodic ping submitted");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Ping worker stopped");
    }))
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use taskscheduler_core::Config;

    use super::*;
    use crate::startup::build_app_state;

    #[tokio::test]
    async fn empty_site_list_disables_worker() {
        let state = build_app_state(&Config::default()).unwrap();
        let (_tx, rx) = watch::channel(false);
        assert!(spawn_ping_worker(state, Vec::new(), Duration::from_millis(10), rx).is_none());
    }

    #[tokio::test]
    async fn submits_each_site_per_tick_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            while listener.accept().await.is_ok() {}
        });

        let mut config = Config::default();
        config.tasks.ping_port = port;
        let state = build_app_state(&config).unwrap();
        let (tx, rx) = watch::channel(false);

        let handle = spawn_ping_worker(
            Arc::clone(&state),
            vec!["127.0.0.1".into(), "localhost".into()],
            Duration::from_millis(20),
            rx,
        )
        .expect("worker spawned");

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while state.scheduler.len() < 4 {
            assert!(tokio::time::Instant::now() < deadline, "worker submitted too few tasks");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tx.send(true).unwrap();
        handle.await.unwrap();

        let submitted = state.scheduler.len();
        assert_eq!(submitted % 2, 0, "each tick submits one task per site");
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(state.scheduler.len(), submitted, "no submissions after shutdown");
    }

    #[tokio::test]
    async fn dropped_sender_stops_worker() {
        let state = build_app_state(&Config::default()).unwrap();
        let (tx, rx) = watch::channel(false);
        let handle = spawn_ping_worker(state, vec!["localhost".into()], Duration::from_secs(60), rx)
            .unwrap();
        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker exits")
            .unwrap();
    }
}

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::registry::{self, SharedRegistry};
use crate::task::{TaskId, TaskRecord};
use crate::work::{Work, WorkError};

use super::Scheduler;

impl Scheduler {
    /// Register `work` as a Pending task and dispatch it in the background.
    ///
    /// Returns immediately; the id is visible to [`get`](Self::get) before this
    /// returns. The work starts once a permit is free.
    pub fn submit<W: Work>(&self, work: W) -> TaskId {
        self.submit_shared(Arc::new(work))
    }

    /// Same as [`submit`](Self::submit) for an already type-erased work item.
    pub fn submit_shared(&self, work: Arc<dyn Work>) -> TaskId {
        let id = TaskId::new();
        registry::write(&self.registry).insert(id, TaskRecord::pending(id));
        debug!(task_id = %id, work = work.name(), "task submitted");

        let unit = ExecutionUnit {
            id,
            work,
            registry: Arc::clone(&self.registry),
            permits: Arc::clone(&self.permits),
            runtime: self.runtime.clone(),
        };
        self.runtime.spawn(unit.run());
        id
    }
}

/// Everything one submission needs to run, moved onto its own Tokio task.
struct ExecutionUnit {
    id: TaskId,
    work: Arc<dyn Work>,
    registry: SharedRegistry,
    permits: Arc<Semaphore>,
    runtime: Handle,
}

impl ExecutionUnit {
    async fn run(self) {
        let id = self.id;

        // The pool is never closed while the scheduler lives, so this only
        // fails if the runtime is tearing everything down.
        let _permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!(task_id = %id, "permit pool closed before admission");
                return;
            }
        };

        let admitted = match registry::write(&self.registry).get_mut(&id) {
            Some(record) => record.start(),
            None => false,
        };
        if !admitted {
            warn!(task_id = %id, "task missing or not pending at admission; skipping");
            return;
        }
        debug!(task_id = %id, work = self.work.name(), "task running");

        let started = Instant::now();
        let work = Arc::clone(&self.work);
        // Run the body as its own task so a panic is caught by the runtime
        // instead of unwinding through this unit while it holds the permit.
        let outcome = match self.runtime.spawn(async move { work.run().await }).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => Err(WorkError::new(format!(
                "task panicked: {}",
                panic_message(e.into_panic().as_ref())
            ))),
            Err(e) => Err(WorkError::new(format!("task aborted: {e}"))),
        };
        let elapsed = started.elapsed();

        match &outcome {
            Ok(_) => info!(task_id = %id, work = self.work.name(), ?elapsed, "task done"),
            Err(e) => warn!(task_id = %id, work = self.work.name(), ?elapsed, error = %e, "task failed"),
        }

        let recorded = match registry::write(&self.registry).get_mut(&id) {
            Some(record) => record.finish(outcome),
            None => false,
        };
        if !recorded {
            warn!(task_id = %id, "task missing or not running at completion; outcome dropped");
        }
        // `_permit` drops here, on every path out of this function.
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

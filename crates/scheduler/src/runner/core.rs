use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::info;

use crate::error::SchedulerError;
use crate::registry::{self, new_shared_registry, SharedRegistry};
use crate::stats::TaskStats;
use crate::task::{TaskId, TaskRecord};

/// Runs submitted [`Work`](crate::Work) with at most `limit` items executing
/// at once and keeps a record of every submission.
///
/// One instance per service; share it behind an `Arc`.
pub struct Scheduler {
    pub(super) limit: usize,
    /// Every task ever submitted. Records are never evicted.
    pub(super) registry: SharedRegistry,
    /// Admission permits; a task holds one while Running.
    pub(super) permits: Arc<Semaphore>,
    /// Runtime that execution units are spawned on.
    pub(super) runtime: Handle,
}

impl Scheduler {
    /// Create a scheduler on the current Tokio runtime.
    pub fn new(limit: usize) -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        Self::with_runtime(limit, runtime)
    }

    /// Create a scheduler that spawns onto `runtime`. Useful when `submit` is
    /// called from threads outside the runtime.
    pub fn with_runtime(limit: usize, runtime: Handle) -> Result<Self, SchedulerError> {
        if limit == 0 || limit > Semaphore::MAX_PERMITS {
            return Err(SchedulerError::InvalidLimit(limit));
        }
        info!(limit, "scheduler created");
        Ok(Self {
            limit,
            registry: new_shared_registry(),
            permits: Arc::new(Semaphore::new(limit)),
            runtime,
        })
    }

    /// Maximum number of concurrently running tasks.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Permits not currently held by a running task.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Snapshot of the task with `id`, or `None` if no such task was submitted.
    pub fn get(&self, id: &TaskId) -> Option<TaskRecord> {
        registry::read(&self.registry).get(id).cloned()
    }

    /// Per-status counts over the whole registry, taken in one locked pass.
    pub fn stats(&self) -> TaskStats {
        registry::read(&self.registry)
            .values()
            .map(|record| record.status)
            .collect()
    }

    /// Number of tasks ever submitted.
    pub fn len(&self) -> usize {
        registry::read(&self.registry).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("limit", &self.limit)
            .field("available_permits", &self.available_permits())
            .field("tasks", &self.len())
            .finish()
    }
}

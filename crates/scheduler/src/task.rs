use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::work::WorkError;

/// Opaque task identifier, generated at submission and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Queued, waiting for a concurrency permit.
    Pending,
    /// Holding a permit and executing.
    Running,
    /// Completed successfully.
    Done,
    /// Completed with a failure.
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [Self::Pending, Self::Running, Self::Done, Self::Failed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of one submitted task.
///
/// The live record sits in the scheduler's registry and is only mutated there,
/// under the registry lock; callers receive clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub status: TaskStatus,
    /// Payload of a successful run. Set only when `status` is `Done`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Failure reason. Set only when `status` is `Failed`.
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl TaskRecord {
    pub(crate) fn pending(id: TaskId) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            result: None,
            failure: None,
        }
    }

    /// Pending -> Running. Returns false (and changes nothing) from any other state.
    pub(crate) fn start(&mut self) -> bool {
        if self.status != TaskStatus::Pending {
            return false;
        }
        self.status = TaskStatus::Running;
        true
    }

    /// Running -> Done | Failed. Returns false (and changes nothing) from any other state.
    pub(crate) fn finish(&mut self, outcome: Result<String, WorkError>) -> bool {
        if self.status != TaskStatus::Running {
            return false;
        }
        match outcome {
            Ok(result) => {
                self.status = TaskStatus::Done;
                self.result = Some(result);
            }
            Err(e) => {
                self.status = TaskStatus::Failed;
                self.failure = Some(e.to_string());
            }
        }
        true
    }
}

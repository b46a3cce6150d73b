use serde::Serialize;

use crate::task::TaskStatus;

/// Number of task records in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub pending: usize,
    pub running: usize,
    pub done: usize,
    pub failed: usize,
}

impl TaskStats {
    pub fn record(&mut self, status: TaskStatus) {
        *self.slot(status) += 1;
    }

    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::Running => self.running,
            TaskStatus::Done => self.done,
            TaskStatus::Failed => self.failed,
        }
    }

    /// Sum over all statuses, i.e. the number of tasks ever submitted.
    pub fn total(&self) -> usize {
        self.pending + self.running + self.done + self.failed
    }

    fn slot(&mut self, status: TaskStatus) -> &mut usize {
        match status {
            TaskStatus::Pending => &mut self.pending,
            TaskStatus::Running => &mut self.running,
            TaskStatus::Done => &mut self.done,
            TaskStatus::Failed => &mut self.failed,
        }
    }
}

impl FromIterator<TaskStatus> for TaskStats {
    fn from_iter<I: IntoIterator<Item = TaskStatus>>(iter: I) -> Self {
        let mut stats = Self::default();
        for status in iter {
            stats.record(status);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_zero() {
        let s = TaskStats::default();
        for status in TaskStatus::ALL {
            assert_eq!(s.get(status), 0);
        }
        assert_eq!(s.total(), 0);
    }

    #[test]
    fn counts_by_status() {
        let s: TaskStats = [
            TaskStatus::Pending,
            TaskStatus::Done,
            TaskStatus::Done,
            TaskStatus::Failed,
        ]
        .into_iter()
        .collect();
        assert_eq!(s.pending, 1);
        assert_eq!(s.running, 0);
        assert_eq!(s.done, 2);
        assert_eq!(s.failed, 1);
        assert_eq!(s.total(), 4);
    }

    #[test]
    fn serializes_every_status_key() {
        let json = serde_json::to_value(TaskStats::default()).unwrap();
        for status in TaskStatus::ALL {
            assert_eq!(json[status.as_str()], 0, "missing key {status}");
        }
    }
}

/// Errors raised while constructing a [`Scheduler`](crate::Scheduler).
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("invalid concurrency limit {0}: must be between 1 and {max}", max = tokio::sync::Semaphore::MAX_PERMITS)]
    InvalidLimit(usize),
    #[error("scheduler must be created inside a Tokio runtime")]
    NoRuntime,
}

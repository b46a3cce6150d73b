use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// Failure reason reported by a work item. Stored verbatim on the task record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct WorkError(String);

impl WorkError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

impl From<String> for WorkError {
    fn from(reason: String) -> Self {
        Self(reason)
    }
}

impl From<&str> for WorkError {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

/// A deferred computation the scheduler can run.
///
/// Implementations own whatever deadline they need; the scheduler never
/// interrupts a running item.
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Short label used in log events.
    fn name(&self) -> &str {
        "work"
    }

    async fn run(&self) -> Result<String, WorkError>;
}

/// Adapter turning an async closure into [`Work`]. See [`work_fn`].
pub struct FnWork<F> {
    name: &'static str,
    f: F,
}

/// Wrap an async closure as a work item.
///
/// ```
/// use taskscheduler_scheduler::{work_fn, WorkError};
///
/// let work = work_fn(|| async { Ok::<_, WorkError>("ok".to_string()) });
/// # let _ = work;
/// ```
pub fn work_fn<F, Fut>(f: F) -> FnWork<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, WorkError>> + Send,
{
    FnWork { name: "fn", f }
}

impl<F> FnWork<F> {
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

#[async_trait]
impl<F, Fut> Work for FnWork<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, WorkError>> + Send,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self) -> Result<String, WorkError> {
        (self.f)().await
    }
}

/// Adapter running a synchronous closure on the runtime's blocking pool.
/// See [`blocking`].
pub struct Blocking<F> {
    name: &'static str,
    f: Arc<F>,
}

/// Wrap a blocking closure (file or socket I/O, CPU work) as a work item.
pub fn blocking<F>(f: F) -> Blocking<F>
where
    F: Fn() -> Result<String, WorkError> + Send + Sync + 'static,
{
    Blocking {
        name: "blocking",
        f: Arc::new(f),
    }
}

impl<F> Blocking<F> {
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

#[async_trait]
impl<F> Work for Blocking<F>
where
    F: Fn() -> Result<String, WorkError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self) -> Result<String, WorkError> {
        let f = Arc::clone(&self.f);
        tokio::task::spawn_blocking(move || f())
            .await
            .map_err(|e| WorkError::new(format!("blocking work did not complete: {e}")))?
    }
}

//! Concurrency-bounded task scheduler.
//!
//! The [`Scheduler`] accepts [`Work`] items, records each as a [`TaskRecord`]
//! in its registry, and runs them on the Tokio runtime with at most `limit`
//! executing at once. Records move Pending -> Running -> Done | Failed and are
//! queried by [`TaskId`] or aggregated into [`TaskStats`].
//!
//! Admission order is whatever order the permit pool grants; there is no FIFO
//! guarantee between queued tasks.

pub mod error;
pub mod registry;
pub mod runner;
pub mod stats;
pub mod task;
pub mod work;

pub use error::SchedulerError;
pub use runner::Scheduler;
pub use stats::TaskStats;
pub use task::{TaskId, TaskRecord, TaskStatus};
pub use work::{blocking, work_fn, Blocking, FnWork, Work, WorkError};

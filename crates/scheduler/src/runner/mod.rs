//! Scheduler runner -- registry ownership and bounded task execution.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, constructor, and read-side queries (`get`, `stats`)
//! - `execution`: `submit` and the per-task execution unit

mod core;
mod execution;

pub use self::core::Scheduler;

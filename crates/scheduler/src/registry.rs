use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{TaskId, TaskRecord};

/// Task records keyed by id. Reads share the lock; every write is exclusive.
pub type Registry = HashMap<TaskId, TaskRecord>;

/// Thread-safe handle to the registry.
pub type SharedRegistry = Arc<RwLock<Registry>>;

pub fn new_shared_registry() -> SharedRegistry {
    Arc::new(RwLock::new(Registry::new()))
}

// Record transitions are single assignments, so a writer that panicked cannot
// leave a record half-updated; recovering the guard is sound.

pub(crate) fn read(registry: &SharedRegistry) -> RwLockReadGuard<'_, Registry> {
    registry.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write(registry: &SharedRegistry) -> RwLockWriteGuard<'_, Registry> {
    registry.write().unwrap_or_else(PoisonError::into_inner)
}

//! Non-blocking, keyed mutual exclusion for in-flight remote mutations.
//!
//! A store's catalogue is locked while an availability change for it is in
//! flight. Callers never wait for a lock: a held lock means the action is
//! rejected, and the UI keeps the control disabled until release.

mod error;
mod in_memory;
mod lock;
mod lock_manager;

use std::sync::Arc;

use tracing::warn;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::Lock;
pub use lock_manager::LockManager;

/// Holds a lock until dropped.
///
/// Release on drop covers every way an operation can end: success, a
/// reported failure, or the future being dropped mid-flight.
pub struct LockGuard<L: Lock> {
    lock: Arc<L>,
    key: String,
}

impl<L: Lock> LockGuard<L> {
    /// Try to take the lock for `key`. Returns `Ok(None)` if it is held.
    pub fn try_acquire<M>(manager: &M, key: &str) -> Result<Option<Self>, LockError>
    where
        M: LockManager<Lock = L>,
    {
        let lock = manager.get_lock(key)?;
        if lock.try_lock()? {
            Ok(Some(Self {
                lock,
                key: key.to_string(),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<L: Lock> Drop for LockGuard<L> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            warn!(key = %self.key, error = %e, "failed to release lock");
        }
    }
}

use std::sync::Arc;

use super::{Lock, LockError};

/// Factory trait for obtaining per-key locks.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or create) the lock for `key`.
    ///
    /// Repeated calls with the same key must return the same logical lock.
    fn get_lock(&self, key: &str) -> Result<Arc<Self::Lock>, LockError>;

    /// Whether the lock for `key` is currently held. Unknown keys are free.
    fn is_locked(&self, key: &str) -> Result<bool, LockError> {
        self.get_lock(key)?.is_locked()
    }
}

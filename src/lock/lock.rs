use super::LockError;

/// Trait for a single lock instance.
///
/// Only non-blocking acquisition is offered; a caller that finds the lock
/// held rejects its action instead of waiting.
pub trait Lock: Send + Sync {
    /// Try to acquire the lock.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock. Releasing a free lock is a no-op.
    fn unlock(&self) -> Result<(), LockError>;

    fn is_locked(&self) -> Result<bool, LockError>;
}

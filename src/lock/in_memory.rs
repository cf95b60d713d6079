use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{Lock, LockError, LockManager};

/// In-memory lock backed by a `Mutex<bool>`.
pub struct InMemoryLock {
    state: Mutex<bool>,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            state: Mutex::new(false),
        }
    }
}

impl Default for InMemoryLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock for InMemoryLock {
    fn try_lock(&self) -> Result<bool, LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            Ok(false)
        } else {
            *locked = true;
            Ok(true)
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        *locked = false;
        Ok(())
    }

    fn is_locked(&self) -> Result<bool, LockError> {
        let locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        Ok(*locked)
    }
}

/// In-memory lock manager backed by a `HashMap<String, Arc<InMemoryLock>>`.
///
/// Lazily creates one `InMemoryLock` per key and returns the same `Arc`
/// for repeated lookups.
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<String, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, key: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
        Ok(locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(InMemoryLock::new()))
            .clone())
    }

    /// Looks the key up without creating a lock for it.
    fn is_locked(&self, key: &str) -> Result<bool, LockError> {
        let lock = {
            let locks = self
                .locks
                .lock()
                .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
            locks.get(key).cloned()
        };
        match lock {
            Some(lock) => lock.is_locked(),
            None => Ok(false),
        }
    }
}

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::CoordinatorError;
use crate::entity_store::EntityStore;
use crate::lock::{InMemoryLockManager, LockGuard, LockManager};
use crate::model::{CatalogueEntry, CataloguePatch};
use crate::transport::{
    AvailabilityPatch, CatalogueQuery, NewCatalogueEntry, Operation, Transport,
};

/// Serializes catalogue changes per store.
///
/// A store's catalogue moves `idle -> updating -> idle`. While a change is in
/// flight every other change to the same catalogue is rejected with
/// [`CoordinatorError::Busy`]; the lock is released whether the remote call
/// succeeds or fails.
pub struct CatalogueCoordinator<T, M = InMemoryLockManager> {
    transport: Arc<T>,
    store: EntityStore,
    locks: M,
}

impl<T: Transport> CatalogueCoordinator<T> {
    pub fn new(transport: Arc<T>, store: EntityStore) -> Self {
        Self::with_lock_manager(transport, store, InMemoryLockManager::new())
    }
}

impl<T: Transport, M: LockManager> CatalogueCoordinator<T, M> {
    pub fn with_lock_manager(transport: Arc<T>, store: EntityStore, locks: M) -> Self {
        Self {
            transport,
            store,
            locks,
        }
    }

    /// Whether a change to this store's catalogue is in flight. UIs use this
    /// to disable availability controls.
    pub fn is_busy(&self, store_id: &str) -> Result<bool, CoordinatorError> {
        Ok(self.locks.is_locked(store_id)?)
    }

    /// Flip an entry's availability. The stored result is whatever the
    /// backend answers, not the requested inverse.
    ///
    /// If the entry is gone locally by the time the backend answers, returns
    /// [`CoordinatorError::Unsynced`]: the change did happen remotely.
    #[instrument(skip(self, entry), fields(store_id = %entry.store_id, food_local_id = %entry.food_local_id))]
    pub async fn toggle(&self, entry: &CatalogueEntry) -> Result<CatalogueEntry, CoordinatorError> {
        let _guard = self.acquire(&entry.store_id)?;
        self.store.snapshot()?;

        let patch = AvailabilityPatch {
            food_local_id: entry.food_local_id.clone(),
            is_available: !entry.is_available,
        };
        let canonical = self
            .transport
            .patch_catalogue_entry(&entry.store_id, &patch)
            .await
            .map_err(|e| {
                warn!(error = %e, "availability change failed");
                CoordinatorError::mutation(Operation::PatchCatalogueEntry, e)
            })?;

        self.store
            .patch_catalogue_entry(
                &entry.store_id,
                &entry.food_local_id,
                CataloguePatch::from(canonical.clone()),
            )
            .map_err(|e| CoordinatorError::unsynced(Operation::PatchCatalogueEntry, e))?;
        info!(
            requested = patch.is_available,
            is_available = canonical.is_available,
            "availability changed"
        );
        Ok(canonical)
    }

    /// Add a food item to a store's catalogue as available.
    #[instrument(skip(self))]
    pub async fn add(&self, store_id: &str, food_local_id: &str) -> Result<CatalogueEntry, CoordinatorError> {
        let _guard = self.acquire(store_id)?;
        self.store.snapshot()?;

        let request = NewCatalogueEntry {
            store_id: store_id.to_string(),
            food_local_id: food_local_id.to_string(),
            is_available: true,
        };
        let created = self
            .transport
            .add_catalogue_entry(&request)
            .await
            .map_err(|e| {
                warn!(error = %e, "adding catalogue entry failed");
                CoordinatorError::mutation(Operation::AddCatalogueEntry, e)
            })?;

        self.store
            .insert_catalogue_entry(created.clone())
            .map_err(|e| CoordinatorError::unsynced(Operation::AddCatalogueEntry, e))?;
        info!("catalogue entry added");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, store_id: &str, food_local_id: &str) -> Result<(), CoordinatorError> {
        let _guard = self.acquire(store_id)?;
        self.store.snapshot()?;

        self.transport
            .remove_catalogue_entry(store_id, food_local_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "removing catalogue entry failed");
                CoordinatorError::mutation(Operation::RemoveCatalogueEntry, e)
            })?;

        self.store
            .remove_catalogue_entry(store_id, food_local_id)
            .map_err(|e| CoordinatorError::unsynced(Operation::RemoveCatalogueEntry, e))?;
        info!("catalogue entry removed");
        Ok(())
    }

    /// Refetch one store's catalogue and replace it locally.
    #[instrument(skip(self))]
    pub async fn refresh(&self, store_id: &str) -> Result<Vec<CatalogueEntry>, CoordinatorError> {
        let _guard = self.acquire(store_id)?;
        self.store.snapshot()?;

        let entries = self
            .transport
            .fetch_catalogue(&CatalogueQuery::for_store(store_id))
            .await
            .map_err(|e| {
                warn!(error = %e, "catalogue fetch failed");
                CoordinatorError::mutation(Operation::FetchCatalogue, e)
            })?;

        self.store
            .replace_catalogue(store_id, entries.clone())
            .map_err(|e| CoordinatorError::unsynced(Operation::FetchCatalogue, e))?;
        debug!(entries = entries.len(), "catalogue refreshed");
        Ok(entries)
    }

    fn acquire(&self, store_id: &str) -> Result<LockGuard<M::Lock>, CoordinatorError> {
        match LockGuard::try_acquire(&self.locks, store_id)? {
            Some(guard) => Ok(guard),
            None => {
                debug!(store_id, "catalogue busy, change rejected");
                Err(CoordinatorError::Busy {
                    store_id: store_id.to_string(),
                })
            }
        }
    }
}

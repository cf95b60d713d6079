//! Entity Store - the in-memory stores, comments and catalogues of one view
//! session.
//!
//! Readers get an immutable [`Snapshot`] behind an `Arc`. Every mutation
//! clones the current snapshot, edits the clone, bumps the version and swaps
//! it in under the write lock, so a reader never sees a half-applied change.
//! A mutation that fails publishes nothing.
//!
//! ## Example
//!
//! ```ignore
//! let store = EntityStore::new();
//! store.load(stores, comments);
//! store.upsert_comment(created)?;
//! let snapshot = store.snapshot()?;
//! ```

mod snapshot;

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::model::{CatalogueEntry, CataloguePatch, Comment, Store};

pub use snapshot::Snapshot;

/// Error type for entity store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entity store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("entity store is not loaded")]
    NotLoaded,
    #[error("store not found: {0}")]
    StoreNotFound(String),
    #[error("catalogue entry not found: {store_id}/{food_local_id}")]
    CatalogueEntryNotFound {
        store_id: String,
        food_local_id: String,
    },
}

/// Load status of the store.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Nothing has been loaded yet.
    NotLoaded,
    /// The last bulk load failed; no data is published.
    Failed(String),
    Loaded(Arc<Snapshot>),
}

struct Inner {
    state: LoadState,
    version: u64,
}

/// Shared handle to the session's entities. Clones share storage.
#[derive(Clone)]
pub struct EntityStore {
    inner: Arc<RwLock<Inner>>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state: LoadState::NotLoaded,
                version: 0,
            })),
        }
    }

    /// Replace both collections at once and publish them as loaded.
    /// Duplicate catalogue pairs collapse to the last one seen.
    pub fn load(&self, mut stores: Vec<Store>, comments: Vec<Comment>) -> Result<Arc<Snapshot>, StoreError> {
        for store in &mut stores {
            store.catalogue = unique_by_food(std::mem::take(&mut store.catalogue));
        }
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("load"))?;
        inner.version += 1;
        let snapshot = Arc::new(Snapshot::new(stores, comments, inner.version));
        inner.state = LoadState::Loaded(snapshot.clone());
        Ok(snapshot)
    }

    /// Record a failed bulk load. Any previously published data is dropped so
    /// readers never mix collections from different loads.
    pub fn mark_failed(&self, message: impl Into<String>) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("mark_failed"))?;
        inner.state = LoadState::Failed(message.into());
        Ok(())
    }

    pub fn state(&self) -> Result<LoadState, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("state"))?;
        Ok(inner.state.clone())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state(), Ok(LoadState::Loaded(_)))
    }

    /// The current snapshot, or `NotLoaded` if no load has succeeded.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, StoreError> {
        match self.state()? {
            LoadState::Loaded(snapshot) => Ok(snapshot),
            LoadState::NotLoaded | LoadState::Failed(_) => Err(StoreError::NotLoaded),
        }
    }

    /// Replace a comment by id, or insert it at the head of the collection if
    /// it is new. Head insertion keeps the list newest-first by arrival.
    pub fn upsert_comment(&self, comment: Comment) -> Result<Arc<Snapshot>, StoreError> {
        self.apply("upsert_comment", move |snapshot| {
            let comments = snapshot.comments_mut();
            match comments.iter_mut().find(|c| c.id == comment.id) {
                Some(existing) => *existing = comment,
                None => comments.insert(0, comment),
            }
            Ok(())
        })
    }

    /// Remove a comment by id. Removing an unknown id is a no-op that still
    /// reports `false`.
    pub fn remove_comment(&self, id: &str) -> Result<bool, StoreError> {
        let mut removed = false;
        self.apply("remove_comment", |snapshot| {
            let comments = snapshot.comments_mut();
            let before = comments.len();
            comments.retain(|c| c.id != id);
            removed = comments.len() != before;
            Ok(())
        })?;
        Ok(removed)
    }

    pub fn patch_catalogue_entry(
        &self,
        store_id: &str,
        food_local_id: &str,
        patch: CataloguePatch,
    ) -> Result<Arc<Snapshot>, StoreError> {
        self.apply("patch_catalogue_entry", move |snapshot| {
            let store = snapshot
                .store_by_id_mut(store_id)
                .ok_or_else(|| StoreError::StoreNotFound(store_id.to_string()))?;
            let entry = store
                .catalogue
                .iter_mut()
                .find(|e| e.food_local_id == food_local_id)
                .ok_or_else(|| StoreError::CatalogueEntryNotFound {
                    store_id: store_id.to_string(),
                    food_local_id: food_local_id.to_string(),
                })?;
            patch.apply(entry);
            Ok(())
        })
    }

    /// Add an entry to its store's catalogue, replacing any entry for the same
    /// food item.
    pub fn insert_catalogue_entry(&self, entry: CatalogueEntry) -> Result<Arc<Snapshot>, StoreError> {
        self.apply("insert_catalogue_entry", move |snapshot| {
            let store = snapshot
                .store_by_id_mut(&entry.store_id)
                .ok_or_else(|| StoreError::StoreNotFound(entry.store_id.clone()))?;
            match store
                .catalogue
                .iter_mut()
                .find(|e| e.food_local_id == entry.food_local_id)
            {
                Some(existing) => *existing = entry,
                None => store.catalogue.push(entry),
            }
            Ok(())
        })
    }

    pub fn remove_catalogue_entry(&self, store_id: &str, food_local_id: &str) -> Result<bool, StoreError> {
        let mut removed = false;
        self.apply("remove_catalogue_entry", |snapshot| {
            let store = snapshot
                .store_by_id_mut(store_id)
                .ok_or_else(|| StoreError::StoreNotFound(store_id.to_string()))?;
            let before = store.catalogue.len();
            store.catalogue.retain(|e| e.food_local_id != food_local_id);
            removed = store.catalogue.len() != before;
            Ok(())
        })?;
        Ok(removed)
    }

    /// Swap a store's whole catalogue for a freshly fetched one. Duplicate
    /// food items in `entries` collapse to the last one seen.
    pub fn replace_catalogue(&self, store_id: &str, entries: Vec<CatalogueEntry>) -> Result<Arc<Snapshot>, StoreError> {
        self.apply("replace_catalogue", move |snapshot| {
            let store = snapshot
                .store_by_id_mut(store_id)
                .ok_or_else(|| StoreError::StoreNotFound(store_id.to_string()))?;
            store.catalogue = unique_by_food(entries);
            Ok(())
        })
    }

    /// Copy-on-write mutation: edit a clone of the current snapshot and
    /// publish it only if `f` succeeds.
    fn apply<F>(&self, operation: &'static str, f: F) -> Result<Arc<Snapshot>, StoreError>
    where
        F: FnOnce(&mut Snapshot) -> Result<(), StoreError>,
    {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))?;

        let current = match &inner.state {
            LoadState::Loaded(snapshot) => snapshot,
            LoadState::NotLoaded | LoadState::Failed(_) => return Err(StoreError::NotLoaded),
        };

        let mut next = Snapshot::clone(current);
        f(&mut next)?;

        inner.version += 1;
        next.set_version(inner.version);
        let next = Arc::new(next);
        inner.state = LoadState::Loaded(next.clone());
        Ok(next)
    }
}

/// Keep one entry per food item, last one wins, first-seen order.
fn unique_by_food(entries: Vec<CatalogueEntry>) -> Vec<CatalogueEntry> {
    let mut catalogue: Vec<CatalogueEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match catalogue
            .iter_mut()
            .find(|e| e.food_local_id == entry.food_local_id)
        {
            Some(existing) => *existing = entry,
            None => catalogue.push(entry),
        }
    }
    catalogue
}

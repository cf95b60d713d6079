//! InMemoryTransport - a deterministic in-process backend for tests and
//! offline development.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::Notify;

use super::{
    AvailabilityPatch, CatalogueQuery, CommentPatch, CommentQuery, NewCatalogueEntry, NewComment,
    Operation, StoreQuery, Transport, TransportError,
};
use crate::model::{CatalogueEntry, Comment, Store};

#[derive(Default)]
struct Backend {
    stores: Vec<Store>,
    comments: Vec<Comment>,
    next_id: u64,
    calls: Vec<Operation>,
    failures: HashMap<Operation, TransportError>,
    /// Availability the backend insists on for a (store, food) pair,
    /// whatever the request asked for.
    forced_availability: HashMap<(String, String), bool>,
    patch_gate: Option<Arc<Notify>>,
}

impl Backend {
    fn store_mut(&mut self, store_id: &str) -> Result<&mut Store, TransportError> {
        self.stores
            .iter_mut()
            .find(|s| s.id == store_id)
            .ok_or_else(|| TransportError::not_found(format!("store {store_id} not found")))
    }
}

/// In-memory backend. Clones share state.
///
/// Assigns ids (`comment-1`, `comment-2`, ...) and timestamps to created
/// comments, records every call, and can be told to fail the next call of an
/// operation or to hold catalogue patches in flight.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    backend: Arc<Mutex<Backend>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stores(self, stores: Vec<Store>) -> Self {
        self.backend().stores = stores;
        self
    }

    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        self.backend().comments = comments;
        self
    }

    /// Make the next call of `operation` fail with a 500 and `message`.
    pub fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        self.backend()
            .failures
            .insert(operation, TransportError::new(Some(500), message));
    }

    /// Make every availability patch for this pair resolve to `is_available`.
    pub fn force_availability(&self, store_id: &str, food_local_id: &str, is_available: bool) {
        self.backend()
            .forced_availability
            .insert((store_id.to_string(), food_local_id.to_string()), is_available);
    }

    /// Hold availability patches in flight until the returned gate is
    /// released.
    pub fn pause_catalogue_patches(&self) -> PatchGate {
        let notify = Arc::new(Notify::new());
        self.backend().patch_gate = Some(notify.clone());
        PatchGate {
            backend: self.backend.clone(),
            notify,
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.backend().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.backend()
            .calls
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    /// The backend's own copy of the comments.
    pub fn stored_comments(&self) -> Vec<Comment> {
        self.backend().comments.clone()
    }

    fn backend(&self) -> MutexGuard<'_, Backend> {
        // A panic mid-call leaves the fake in a usable state; recover it.
        self.backend
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and take any failure queued for it.
    fn begin(&self, operation: Operation) -> Result<(), TransportError> {
        let mut backend = self.backend();
        backend.calls.push(operation);
        match backend.failures.remove(&operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn apply_availability(&self, store_id: &str, patch: &AvailabilityPatch) -> Result<CatalogueEntry, TransportError> {
        let mut backend = self.backend();
        let is_available = backend
            .forced_availability
            .get(&(store_id.to_string(), patch.food_local_id.clone()))
            .copied()
            .unwrap_or(patch.is_available);

        let store = backend.store_mut(store_id)?;
        let entry = store
            .catalogue
            .iter_mut()
            .find(|e| e.food_local_id == patch.food_local_id)
            .ok_or_else(|| {
                TransportError::not_found(format!(
                    "food {} is not in the catalogue of store {store_id}",
                    patch.food_local_id
                ))
            })?;
        entry.is_available = is_available;
        Ok(entry.clone())
    }
}

/// Releases availability patches held by
/// [`InMemoryTransport::pause_catalogue_patches`].
pub struct PatchGate {
    backend: Arc<Mutex<Backend>>,
    notify: Arc<Notify>,
}

impl PatchGate {
    /// Let the held patch (or the next one to arrive) through, and stop
    /// holding later ones.
    pub fn release(self) {
        if let Ok(mut backend) = self.backend.lock() {
            backend.patch_gate = None;
        }
        self.notify.notify_one();
    }
}

impl Transport for InMemoryTransport {
    async fn fetch_stores(&self, query: &StoreQuery) -> Result<Vec<Store>, TransportError> {
        self.begin(Operation::FetchStores)?;
        let backend = self.backend();
        Ok(backend
            .stores
            .iter()
            .filter(|store| match &query.food_local_id {
                Some(food) => store.catalogue_entry(food).is_some(),
                None => true,
            })
            .cloned()
            .map(|mut store| {
                if !query.with_user {
                    store.user = None;
                }
                if !query.with_catalogue {
                    store.catalogue.clear();
                }
                store
            })
            .collect())
    }

    async fn fetch_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>, TransportError> {
        self.begin(Operation::FetchComments)?;
        let backend = self.backend();
        Ok(backend
            .comments
            .iter()
            .cloned()
            .map(|mut comment| {
                if !query.with_user {
                    comment.user = None;
                }
                if !query.with_store {
                    comment.store = None;
                }
                comment
            })
            .collect())
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, TransportError> {
        self.begin(Operation::CreateComment)?;
        let mut backend = self.backend();
        backend.next_id += 1;
        let mut created = Comment::new(
            format!("comment-{}", backend.next_id),
            comment.user_id.clone(),
            comment.store_id.clone(),
        )
        .with_content(comment.content.clone())
        .recommended(comment.is_recommended);
        created.created_at = Some(Utc::now());
        backend.comments.insert(0, created.clone());
        Ok(created)
    }

    async fn update_comment(&self, id: &str, patch: &CommentPatch) -> Result<Comment, TransportError> {
        self.begin(Operation::UpdateComment)?;
        let mut backend = self.backend();
        let comment = backend
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TransportError::not_found(format!("comment {id} not found")))?;
        comment.content = patch.content.clone();
        comment.is_recommended = patch.is_recommended;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: &str) -> Result<(), TransportError> {
        self.begin(Operation::DeleteComment)?;
        let mut backend = self.backend();
        let before = backend.comments.len();
        backend.comments.retain(|c| c.id != id);
        if backend.comments.len() == before {
            return Err(TransportError::not_found(format!("comment {id} not found")));
        }
        Ok(())
    }

    async fn patch_catalogue_entry(
        &self,
        store_id: &str,
        patch: &AvailabilityPatch,
    ) -> Result<CatalogueEntry, TransportError> {
        self.begin(Operation::PatchCatalogueEntry)?;
        let gate = self.backend().patch_gate.clone();
        if let Some(notify) = gate {
            notify.notified().await;
        }
        self.apply_availability(store_id, patch)
    }

    async fn fetch_catalogue(&self, query: &CatalogueQuery) -> Result<Vec<CatalogueEntry>, TransportError> {
        self.begin(Operation::FetchCatalogue)?;
        let mut backend = self.backend();
        let store = backend.store_mut(&query.store_id)?;
        Ok(store
            .catalogue
            .iter()
            .filter(|e| match &query.food_local_id {
                Some(food) => &e.food_local_id == food,
                None => true,
            })
            .cloned()
            .map(|mut entry| {
                if !query.with_food {
                    entry.food_local = None;
                }
                entry
            })
            .collect())
    }

    async fn add_catalogue_entry(&self, entry: &NewCatalogueEntry) -> Result<CatalogueEntry, TransportError> {
        self.begin(Operation::AddCatalogueEntry)?;
        let mut backend = self.backend();
        let store = backend.store_mut(&entry.store_id)?;
        if store.catalogue_entry(&entry.food_local_id).is_some() {
            return Err(TransportError::new(
                Some(409),
                format!("food {} is already in the catalogue", entry.food_local_id),
            ));
        }
        let created = CatalogueEntry::new(
            entry.store_id.clone(),
            entry.food_local_id.clone(),
            entry.is_available,
        );
        store.catalogue.push(created.clone());
        Ok(created)
    }

    async fn remove_catalogue_entry(&self, store_id: &str, food_local_id: &str) -> Result<(), TransportError> {
        self.begin(Operation::RemoveCatalogueEntry)?;
        let mut backend = self.backend();
        let store = backend.store_mut(store_id)?;
        let before = store.catalogue.len();
        store.catalogue.retain(|e| e.food_local_id != food_local_id);
        if store.catalogue.len() == before {
            return Err(TransportError::not_found(format!(
                "food {food_local_id} is not in the catalogue of store {store_id}"
            )));
        }
        Ok(())
    }
}

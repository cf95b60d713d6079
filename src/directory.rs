//! StoreDirectory - one view session over the store directory.
//!
//! Owns the entity store, the two coordinators and the selection, and keeps
//! derived views in step with them:
//!
//! ```ignore
//! use foodstore_sync::{InMemoryTransport, Session, StoreDirectory, StoreQuery};
//!
//! let directory = StoreDirectory::new(transport, session);
//! directory.load(&StoreQuery::default()).await?;
//!
//! for store in directory.filtered_stores("huerta")? {
//!     let stats = directory.statistics()?.get(&store.user_id);
//! }
//!
//! directory.select(&store)?;
//! directory.comment_on(&store, "Muy bueno", true).await?;
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, instrument, warn};

use crate::binder::{Selection, SelectionBinder};
use crate::coordinator::{CatalogueCoordinator, CommentCoordinator, CoordinatorError};
use crate::entity_store::{EntityStore, Snapshot, StoreError};
use crate::filter;
use crate::lock::{InMemoryLockManager, LockManager};
use crate::model::{CatalogueEntry, Comment, Store};
use crate::session::Session;
use crate::stats::{StatisticsIndex, StoreStatistics};
use crate::transport::{CommentQuery, NewComment, StoreQuery, Transport};

pub struct StoreDirectory<T, M = InMemoryLockManager> {
    transport: Arc<T>,
    session: Session,
    store: EntityStore,
    comments: CommentCoordinator<T>,
    catalogue: CatalogueCoordinator<T, M>,
    selection: Mutex<SelectionBinder>,
}

impl<T: Transport> StoreDirectory<T> {
    pub fn new(transport: T, session: Session) -> Self {
        Self::with_lock_manager(transport, session, InMemoryLockManager::new())
    }
}

impl<T: Transport, M: LockManager> StoreDirectory<T, M> {
    pub fn with_lock_manager(transport: T, session: Session, locks: M) -> Self {
        let transport = Arc::new(transport);
        let store = EntityStore::new();
        Self {
            comments: CommentCoordinator::new(transport.clone(), store.clone()),
            catalogue: CatalogueCoordinator::with_lock_manager(transport.clone(), store.clone(), locks),
            transport,
            session,
            store,
            selection: Mutex::new(SelectionBinder::new()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn viewer(&self) -> Option<&str> {
        self.session.viewer_id()
    }

    pub fn entity_store(&self) -> &EntityStore {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch stores and comments concurrently and publish them together.
    /// If either fetch fails the directory ends up not loaded.
    #[instrument(skip(self))]
    pub async fn load(&self, query: &StoreQuery) -> Result<Arc<Snapshot>, CoordinatorError> {
        let comment_query = CommentQuery::default();
        let fetched = tokio::try_join!(
            self.transport.fetch_stores(query),
            self.transport.fetch_comments(&comment_query),
        );

        let (stores, comments) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(error = %e, "directory load failed");
                self.store.mark_failed(e.message.clone())?;
                return Err(CoordinatorError::Load { message: e.message });
            }
        };

        info!(stores = stores.len(), comments = comments.len(), "directory loaded");
        let snapshot = self.store.load(stores, comments)?;
        self.binder()?.refresh(&snapshot);
        Ok(snapshot)
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    pub fn snapshot(&self) -> Result<Arc<Snapshot>, CoordinatorError> {
        Ok(self.store.snapshot()?)
    }

    /// Per-store statistics for the current viewer, rebuilt from the full
    /// comment collection.
    pub fn statistics(&self) -> Result<StatisticsIndex, CoordinatorError> {
        Ok(self.snapshot()?.statistics(self.viewer()))
    }

    pub fn statistics_for(&self, store: &Store) -> Result<StoreStatistics, CoordinatorError> {
        Ok(self.statistics()?.get(&store.user_id))
    }

    /// Stores whose owner name contains `query`, in listing order.
    pub fn filtered_stores(&self, query: &str) -> Result<Vec<Store>, CoordinatorError> {
        let snapshot = self.snapshot()?;
        let stores = filter::filter_stores(snapshot.stores(), query)
            .into_iter()
            .cloned()
            .collect();
        Ok(stores)
    }

    /// Open `store`. Replaces any store that was open.
    pub fn select(&self, store: &Store) -> Result<Selection, CoordinatorError> {
        let snapshot = self.snapshot()?;
        Ok(self.binder()?.select(store.clone(), &snapshot).clone())
    }

    pub fn deselect(&self) -> Result<(), CoordinatorError> {
        self.binder()?.deselect();
        Ok(())
    }

    /// The open store and its comments, as of the latest snapshot.
    pub fn selection(&self) -> Result<Option<Selection>, CoordinatorError> {
        let mut binder = self.binder()?;
        if let Ok(snapshot) = self.store.snapshot() {
            binder.refresh(&snapshot);
        }
        Ok(binder.current().cloned())
    }

    pub async fn create_comment(&self, comment: NewComment) -> Result<Comment, CoordinatorError> {
        let created = self.comments.create(comment).await?;
        self.sync_selection()?;
        Ok(created)
    }

    /// Comment on `store` as the signed-in viewer. Only offer this when
    /// the viewer does not own the store (see [`Store::is_owned_by`]).
    pub async fn comment_on(
        &self,
        store: &Store,
        content: impl Into<String>,
        is_recommended: bool,
    ) -> Result<Comment, CoordinatorError> {
        let viewer = self.viewer().ok_or(CoordinatorError::MissingViewer)?;
        let comment = NewComment::new(viewer, store.user_id.clone(), content).recommended(is_recommended);
        self.create_comment(comment).await
    }

    /// Edit a comment. Only offer this to the comment's author.
    pub async fn update_comment(
        &self,
        comment: &Comment,
        content: impl Into<String>,
        is_recommended: bool,
    ) -> Result<Comment, CoordinatorError> {
        let updated = self
            .comments
            .update(comment, content.into(), is_recommended)
            .await?;
        self.sync_selection()?;
        Ok(updated)
    }

    /// Delete a comment. Only offer this to the comment's author.
    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), CoordinatorError> {
        self.comments.delete(comment_id).await?;
        self.sync_selection()?;
        Ok(())
    }

    pub async fn toggle_availability(&self, entry: &CatalogueEntry) -> Result<CatalogueEntry, CoordinatorError> {
        let updated = self.catalogue.toggle(entry).await?;
        self.sync_selection()?;
        Ok(updated)
    }

    /// Whether a catalogue change for this store (by profile id) is in flight.
    pub fn is_toggling(&self, store_id: &str) -> Result<bool, CoordinatorError> {
        self.catalogue.is_busy(store_id)
    }

    pub async fn add_catalogue_entry(
        &self,
        store_id: &str,
        food_local_id: &str,
    ) -> Result<CatalogueEntry, CoordinatorError> {
        let added = self.catalogue.add(store_id, food_local_id).await?;
        self.sync_selection()?;
        Ok(added)
    }

    pub async fn remove_catalogue_entry(&self, store_id: &str, food_local_id: &str) -> Result<(), CoordinatorError> {
        self.catalogue.remove(store_id, food_local_id).await?;
        self.sync_selection()?;
        Ok(())
    }

    pub async fn refresh_catalogue(&self, store_id: &str) -> Result<Vec<CatalogueEntry>, CoordinatorError> {
        let entries = self.catalogue.refresh(store_id).await?;
        self.sync_selection()?;
        Ok(entries)
    }

    fn sync_selection(&self) -> Result<(), CoordinatorError> {
        let snapshot = self.snapshot()?;
        self.binder()?.refresh(&snapshot);
        Ok(())
    }

    fn binder(&self) -> Result<MutexGuard<'_, SelectionBinder>, StoreError> {
        self.selection
            .lock()
            .map_err(|_| StoreError::LockPoisoned("selection"))
    }
}

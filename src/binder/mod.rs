//! Selection binder - the open store and its comments.
//!
//! The comment subset is derived from a snapshot, never stored on its own,
//! and is re-derived whenever a newer snapshot comes along while the store
//! stays open.

use crate::entity_store::Snapshot;
use crate::model::{Comment, Store};

/// The open store and the comments left on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub store: Store,
    pub comments: Vec<Comment>,
    /// Snapshot version the comments were derived from.
    pub version: u64,
}

impl Selection {
    fn derive(store: Store, snapshot: &Snapshot) -> Self {
        // Pick up catalogue edits made since the caller grabbed its copy.
        let store = snapshot
            .store_by_id(&store.id)
            .cloned()
            .unwrap_or(store);
        let comments = snapshot.comments_for(&store.user_id);
        Self {
            store,
            comments,
            version: snapshot.version(),
        }
    }
}

/// Tracks at most one open store.
#[derive(Debug, Default)]
pub struct SelectionBinder {
    current: Option<Selection>,
}

impl SelectionBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `store`, replacing any previous selection.
    pub fn select(&mut self, store: Store, snapshot: &Snapshot) -> &Selection {
        self.current.insert(Selection::derive(store, snapshot))
    }

    pub fn deselect(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Re-derive the open store's comments if `snapshot` is newer than the
    /// one they came from. Returns whether anything was recomputed.
    pub fn refresh(&mut self, snapshot: &Snapshot) -> bool {
        match self.current.take() {
            Some(selection) if selection.version != snapshot.version() => {
                self.current = Some(Selection::derive(selection.store, snapshot));
                true
            }
            other => {
                self.current = other;
                false
            }
        }
    }
}

use crate::model::{Comment, Store};
use crate::stats::{self, StatisticsIndex};

/// An immutable view of the session's collections at one version.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    stores: Vec<Store>,
    comments: Vec<Comment>,
    version: u64,
}

impl Snapshot {
    pub(crate) fn new(stores: Vec<Store>, comments: Vec<Comment>, version: u64) -> Self {
        Self {
            stores,
            comments,
            version,
        }
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Comments, newest arrivals first.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Monotonic across loads and mutations of the owning store.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn store_by_id(&self, id: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == id)
    }

    pub fn store_by_user(&self, user_id: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.user_id == user_id)
    }

    /// Comments left on the store owned by `store_user_id`, in collection order.
    pub fn comments_for(&self, store_user_id: &str) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.store_id == store_user_id)
            .cloned()
            .collect()
    }

    pub fn statistics(&self, viewer: Option<&str>) -> StatisticsIndex {
        stats::reduce(&self.comments, viewer)
    }

    pub(crate) fn comments_mut(&mut self) -> &mut Vec<Comment> {
        &mut self.comments
    }

    pub(crate) fn store_by_id_mut(&mut self, id: &str) -> Option<&mut Store> {
        self.stores.iter_mut().find(|s| s.id == id)
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

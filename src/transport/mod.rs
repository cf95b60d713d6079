//! Transport - the remote backend collaborator.
//!
//! The core only talks to the backend through [`Transport`]. Every call
//! either resolves with the backend's canonical record or fails with a
//! [`TransportError`] whose message is shown to the user as-is. Timeouts,
//! retries and credential refresh belong to the implementation or the
//! caller, never to the core.

mod in_memory;

#[cfg(feature = "http")]
mod http;

use std::fmt;
use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::model::{CatalogueEntry, Comment, Store};

pub use in_memory::{InMemoryTransport, PatchGate};

#[cfg(feature = "http")]
pub use http::RestTransport;

/// The remote operations the core issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchStores,
    FetchComments,
    CreateComment,
    UpdateComment,
    DeleteComment,
    PatchCatalogueEntry,
    FetchCatalogue,
    AddCatalogueEntry,
    RemoveCatalogueEntry,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::FetchStores => "fetch_stores",
            Operation::FetchComments => "fetch_comments",
            Operation::CreateComment => "create_comment",
            Operation::UpdateComment => "update_comment",
            Operation::DeleteComment => "delete_comment",
            Operation::PatchCatalogueEntry => "patch_catalogue_entry",
            Operation::FetchCatalogue => "fetch_catalogue",
            Operation::AddCatalogueEntry => "add_catalogue_entry",
            Operation::RemoveCatalogueEntry => "remove_catalogue_entry",
        };
        f.write_str(name)
    }
}

/// A failed remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    /// HTTP-style status, when the backend answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Some(404), message)
    }
}

/// Which stores to list, and which relations to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    /// Only stores whose catalogue holds this food item.
    pub food_local_id: Option<String>,
    pub with_user: bool,
    pub with_catalogue: bool,
}

impl Default for StoreQuery {
    fn default() -> Self {
        Self {
            food_local_id: None,
            with_user: true,
            with_catalogue: true,
        }
    }
}

impl StoreQuery {
    pub fn selling(food_local_id: impl Into<String>) -> Self {
        Self {
            food_local_id: Some(food_local_id.into()),
            ..Self::default()
        }
    }
}

/// Which relations to embed in listed comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentQuery {
    pub with_user: bool,
    pub with_store: bool,
}

impl Default for CommentQuery {
    fn default() -> Self {
        Self {
            with_user: true,
            with_store: true,
        }
    }
}

/// A store's catalogue, optionally narrowed to one food item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueQuery {
    pub store_id: String,
    pub food_local_id: Option<String>,
    pub with_food: bool,
    pub with_store: bool,
}

impl CatalogueQuery {
    pub fn for_store(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            food_local_id: None,
            with_food: true,
            with_store: true,
        }
    }
}

/// Body of a comment creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    pub is_recommended: bool,
    /// The author.
    pub user_id: String,
    /// The store owner's user id.
    pub store_id: String,
}

impl NewComment {
    pub fn new(
        author_id: impl Into<String>,
        store_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            is_recommended: false,
            user_id: author_id.into(),
            store_id: store_id.into(),
        }
    }

    pub fn recommended(mut self, is_recommended: bool) -> Self {
        self.is_recommended = is_recommended;
        self
    }
}

/// Body of a comment edit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPatch {
    pub content: String,
    pub is_recommended: bool,
}

/// Body of a catalogue availability change, sent per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPatch {
    pub food_local_id: String,
    pub is_available: bool,
}

/// Body of a request adding a food item to a store's catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogueEntry {
    pub store_id: String,
    pub food_local_id: String,
    pub is_available: bool,
}

/// The backend as seen by the core.
///
/// Futures are `Send` so a session can be driven from any runtime task.
pub trait Transport: Send + Sync {
    fn fetch_stores(
        &self,
        query: &StoreQuery,
    ) -> impl Future<Output = Result<Vec<Store>, TransportError>> + Send;

    fn fetch_comments(
        &self,
        query: &CommentQuery,
    ) -> impl Future<Output = Result<Vec<Comment>, TransportError>> + Send;

    /// Returns the stored comment with its server-assigned id and timestamp.
    fn create_comment(
        &self,
        comment: &NewComment,
    ) -> impl Future<Output = Result<Comment, TransportError>> + Send;

    fn update_comment(
        &self,
        id: &str,
        patch: &CommentPatch,
    ) -> impl Future<Output = Result<Comment, TransportError>> + Send;

    fn delete_comment(&self, id: &str) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the entry as the backend stored it, which may differ from
    /// the requested availability.
    fn patch_catalogue_entry(
        &self,
        store_id: &str,
        patch: &AvailabilityPatch,
    ) -> impl Future<Output = Result<CatalogueEntry, TransportError>> + Send;

    fn fetch_catalogue(
        &self,
        query: &CatalogueQuery,
    ) -> impl Future<Output = Result<Vec<CatalogueEntry>, TransportError>> + Send;

    fn add_catalogue_entry(
        &self,
        entry: &NewCatalogueEntry,
    ) -> impl Future<Output = Result<CatalogueEntry, TransportError>> + Send;

    fn remove_catalogue_entry(
        &self,
        store_id: &str,
        food_local_id: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

//! Coordinators - the only writers to the entity store after a load.
//!
//! Each operation validates locally, awaits one remote call, and only on
//! success applies exactly one entity store mutation. Remote failures come
//! back as [`CoordinatorError::Mutation`] and leave local state untouched.

mod catalogue;
mod comments;

use thiserror::Error;

use crate::entity_store::StoreError;
use crate::lock::LockError;
use crate::transport::{Operation, TransportError};

pub use catalogue::CatalogueCoordinator;
pub use comments::CommentCoordinator;

/// Outcome of a failed load or mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// A bulk fetch failed; nothing was published.
    #[error("failed to load the directory: {message}")]
    Load { message: String },
    /// Rejected before any remote call.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The remote call failed. Displays the backend's message unchanged.
    #[error("{message}")]
    Mutation {
        operation: Operation,
        status: Option<u16>,
        message: String,
    },
    /// The backend accepted the change but the local copy could not take it,
    /// e.g. the record vanished in a reload. Not a failed change; refetch.
    #[error("{operation} was applied remotely but the local copy is stale: {source}")]
    Unsynced {
        operation: Operation,
        source: StoreError,
    },
    /// Another catalogue change for this store is still in flight.
    #[error("catalogue of store {store_id} is being updated")]
    Busy { store_id: String },
    /// The operation needs a signed-in viewer.
    #[error("no viewer is signed in")]
    MissingViewer,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl CoordinatorError {
    pub(crate) fn mutation(operation: Operation, err: TransportError) -> Self {
        CoordinatorError::Mutation {
            operation,
            status: err.status,
            message: err.message,
        }
    }

    pub(crate) fn unsynced(operation: Operation, source: StoreError) -> Self {
        CoordinatorError::Unsynced { operation, source }
    }

    /// Whether the backend holds the requested change despite the error.
    pub fn applied_remotely(&self) -> bool {
        matches!(self, CoordinatorError::Unsynced { .. })
    }
}

/// Comment content must hold something besides whitespace.
pub(crate) fn validate_content(content: &str) -> Result<(), CoordinatorError> {
    if content.trim().is_empty() {
        return Err(CoordinatorError::Validation(
            "comment content must not be empty".into(),
        ));
    }
    Ok(())
}

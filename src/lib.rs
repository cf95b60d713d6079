//! Client-side state engine for a local food store directory.
//!
//! Keeps the stores, comments and catalogues of one view session in an
//! [`EntityStore`], derives per-store recommendation statistics and filtered
//! listings from it, and applies comment and catalogue changes optimistically
//! once the backend accepts them. The backend itself sits behind the
//! [`Transport`] trait.

mod binder;
mod config;
mod coordinator;
mod directory;
mod entity_store;
mod filter;
mod lock;
mod model;
mod session;
mod stats;
mod transport;

pub use binder::{Selection, SelectionBinder};
pub use config::{ClientConfig, ConfigError};
pub use coordinator::{CatalogueCoordinator, CommentCoordinator, CoordinatorError};
pub use directory::StoreDirectory;
pub use entity_store::{EntityStore, LoadState, Snapshot, StoreError};
pub use filter::{filter_stores, matches};
pub use lock::{InMemoryLock, InMemoryLockManager, Lock, LockError, LockGuard, LockManager};
pub use model::{CatalogueEntry, CataloguePatch, Comment, FoodItem, Store, UserProfile};
pub use session::{Credential, Session};
pub use stats::{reduce, StatisticsIndex, StoreStatistics};
pub use transport::{
    AvailabilityPatch, CatalogueQuery, CommentPatch, CommentQuery, InMemoryTransport,
    NewCatalogueEntry, NewComment, Operation, PatchGate, StoreQuery, Transport, TransportError,
};

#[cfg(feature = "http")]
pub use transport::RestTransport;

//! Filter Engine - narrow the store list by a free-text query.

use crate::model::Store;

/// Whether `store` matches `query`: a case-insensitive substring match
/// against the owner's display name. The query is matched as typed,
/// surrounding spaces included. A blank query matches everything; a store
/// without an owner name matches only a blank query.
pub fn matches(store: &Store, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    store
        .display_name()
        .is_some_and(|name| name.to_lowercase().contains(&needle))
}

/// Stores matching `query`, in their original order.
pub fn filter_stores<'a>(stores: &'a [Store], query: &str) -> Vec<&'a Store> {
    stores.iter().filter(|store| matches(store, query)).collect()
}

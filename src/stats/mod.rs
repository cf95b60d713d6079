//! Statistics Reducer - per-store aggregates derived from the comment stream.
//!
//! The index is rebuilt from the whole comment collection every time; it is
//! never patched per comment. Flipping one comment's recommendation touches
//! two counters, and a full pass is what keeps them in step.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::Comment;

/// Aggregate for a single store, keyed by the store owner's user id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatistics {
    pub recommendation_count: usize,
    pub total_comments: usize,
    pub viewer_has_commented: bool,
    pub viewer_has_recommended: bool,
}

/// The result of one reduction. Stores without comments have no bucket and
/// read as [`StoreStatistics::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsIndex {
    buckets: HashMap<String, StoreStatistics>,
}

impl StatisticsIndex {
    /// Statistics for a store, falling back to the all-zero bucket.
    pub fn get(&self, store_user_id: &str) -> StoreStatistics {
        self.buckets
            .get(store_user_id)
            .copied()
            .unwrap_or_default()
    }

    /// The raw bucket, `None` when the store has no comments.
    pub fn bucket(&self, store_user_id: &str) -> Option<&StoreStatistics> {
        self.buckets.get(store_user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoreStatistics)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Reduce `comments` to per-store statistics as seen by `viewer`.
///
/// A viewer's recommended flag ORs across all of their comments on the
/// store, so one recommending comment is enough even if a later one is not.
pub fn reduce(comments: &[Comment], viewer: Option<&str>) -> StatisticsIndex {
    let mut buckets: HashMap<String, StoreStatistics> = HashMap::new();

    for comment in comments {
        let bucket = buckets.entry(comment.store_id.clone()).or_default();
        bucket.total_comments += 1;

        if comment.is_recommended {
            bucket.recommendation_count += 1;
        }

        if viewer.is_some_and(|v| comment.is_authored_by(v)) {
            bucket.viewer_has_commented = true;
            if comment.is_recommended {
                bucket.viewer_has_recommended = true;
            }
        }
    }

    StatisticsIndex { buckets }
}

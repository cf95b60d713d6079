use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{null_as_false, UserProfile};

/// A recommendation comment left by a user on a store.
///
/// `store_id` holds the store owner's user id (`Store::user_id`), never the
/// store profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub store_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_recommended: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<UserProfile>,
}

impl Comment {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, store_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            store_id: store_id.into(),
            created_at: None,
            content: String::new(),
            is_recommended: false,
            is_hidden: false,
            user: None,
            store: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn recommended(mut self, is_recommended: bool) -> Self {
        self.is_recommended = is_recommended;
        self
    }

    /// Whether `viewer` wrote this comment. Edit and delete actions should
    /// only be offered when this holds.
    pub fn is_authored_by(&self, viewer: &str) -> bool {
        self.user_id == viewer
    }

    /// Fill relations and timestamp missing from `self` with those of
    /// `prior`. Edit replies may omit them.
    pub fn with_relations_from(mut self, prior: &Comment) -> Self {
        if self.user.is_none() {
            self.user = prior.user.clone();
        }
        if self.store.is_none() {
            self.store = prior.store.clone();
        }
        if self.created_at.is_none() {
            self.created_at = prior.created_at;
        }
        self
    }
}

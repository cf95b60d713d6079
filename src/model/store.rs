use serde::{Deserialize, Serialize};

use super::{CatalogueEntry, UserProfile};

/// A store profile as listed in the directory.
///
/// `user_id` is the owner's account id and is the key comments and
/// statistics use. `id` identifies the profile record itself and is what
/// catalogue entries point at.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(default, rename = "storeHasFood")]
    pub catalogue: Vec<CatalogueEntry>,
}

impl Store {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_owner_name(mut self, name: impl Into<String>) -> Self {
        let user = self.user.get_or_insert_with(|| UserProfile {
            id: self.user_id.clone(),
            ..UserProfile::default()
        });
        user.name = Some(name.into());
        self
    }

    /// The owner's display name, if the owner profile was included.
    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.name.as_deref())
    }

    /// Whether `viewer` owns this store. Owners should not be offered to
    /// comment on their own store.
    pub fn is_owned_by(&self, viewer: &str) -> bool {
        self.user_id == viewer
    }

    pub fn catalogue_entry(&self, food_local_id: &str) -> Option<&CatalogueEntry> {
        self.catalogue
            .iter()
            .find(|entry| entry.food_local_id == food_local_id)
    }
}

//! Wire and in-memory records for stores, comments and catalogue entries.
//!
//! All records use the backend's camelCase JSON shape. Optional relations
//! (`user`, `store`, `foodLocal`) are only present when the fetch asked for
//! them with the matching include flag.

mod catalogue;
mod comment;
mod store;

use serde::{Deserialize, Deserializer, Serialize};

pub use catalogue::{CatalogueEntry, CataloguePatch, FoodItem};
pub use comment::Comment;
pub use store::Store;

/// Public profile of a user account (store owners and comment authors).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

/// Deserialize a nullable boolean, treating `null` (and a missing field, via
/// `#[serde(default)]`) as `false`.
pub(crate) fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

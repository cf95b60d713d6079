use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::null_as_false;

/// A food item known to the platform. `food_data` is the external nutrition
/// payload and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub food_data: Value,
}

/// A (store, food item) pairing with an availability flag.
///
/// Identified by `(store_id, food_local_id)`; `store_id` is the store
/// profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntry {
    pub store_id: String,
    pub food_local_id: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_local: Option<FoodItem>,
}

impl CatalogueEntry {
    pub fn new(store_id: impl Into<String>, food_local_id: impl Into<String>, is_available: bool) -> Self {
        Self {
            store_id: store_id.into(),
            food_local_id: food_local_id.into(),
            is_available,
            food_local: None,
        }
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.store_id, &self.food_local_id)
    }
}

/// Authoritative state to write over a catalogue entry.
///
/// A patch without a food item keeps the one already held locally, since
/// patch responses do not always embed the relation.
#[derive(Debug, Clone, PartialEq)]
pub struct CataloguePatch {
    pub is_available: bool,
    pub food_local: Option<FoodItem>,
}

impl CataloguePatch {
    pub fn apply(self, entry: &mut CatalogueEntry) {
        entry.is_available = self.is_available;
        if let Some(food) = self.food_local {
            entry.food_local = Some(food);
        }
    }
}

impl From<CatalogueEntry> for CataloguePatch {
    fn from(entry: CatalogueEntry) -> Self {
        Self {
            is_available: entry.is_available,
            food_local: entry.food_local,
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Clothing catalog model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A catalog entry, written by the import tool and read by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    /// Display name (e.g., "Mustard yellow sweater")
    pub name: String,
    /// Grouping key (e.g., "Sweaters & Knits")
    pub category: String,
    /// Image URL
    pub url: String,
    /// Match key derived from `name`; see [`name_key`].
    #[serde(default)]
    pub name_key: String,
}

impl ClothingItem {
    pub fn new(name: &str, category: &str, url: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            url: url.trim().to_string(),
            name_key: name_key(name),
        }
    }
}

/// Normalized form used for case-insensitive exact name matching.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Category -> ordered canonical item names. Built per request, never stored.
pub type RecommendationMap = BTreeMap<String, Vec<String>>;

/// Catalog item as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecommendedItem {
    pub name: String,
    pub category: String,
    pub url: String,
}

impl From<ClothingItem> for RecommendedItem {
    fn from(item: ClothingItem) -> Self {
        Self {
            name: item.name,
            category: item.category,
            url: item.url,
        }
    }
}

/// Category -> catalog items, as returned by `GET /api/recommendations`.
pub type GroupedItems = BTreeMap<String, Vec<RecommendedItem>>;

/// Raw image URL stored by the import tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_name_key() {
        let item = ClothingItem::new("  MUSTARD Yellow Sweater ", "Sweaters & Knits", "https://x/1.jpg");
        assert_eq!(item.name, "MUSTARD Yellow Sweater");
        assert_eq!(item.name_key, "mustard yellow sweater");
    }
}

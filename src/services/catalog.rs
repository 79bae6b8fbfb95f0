// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Turns recommended item names into catalog items grouped by category.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::clothing::name_key;
use crate::models::{ClothingItem, GroupedItems};
use crate::models::RecommendationMap;
use crate::services::recommendation::RecommendationTable;
use std::collections::BTreeSet;

/// Profile attributes a recommendation is computed from.
#[derive(Debug, Clone, Default)]
pub struct ProfileQuery<'a> {
    pub gender: Option<&'a str>,
    pub body_type: Option<&'a str>,
    pub skin_undertone: Option<&'a str>,
}

/// Treat empty and whitespace-only values as missing.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve recommendations for a profile.
///
/// `body_type` must be present but does not influence the result yet.
/// Categories without any matching catalog item are left out.
pub async fn resolve(
    db: &Database,
    table: &RecommendationTable,
    query: &ProfileQuery<'_>,
) -> Result<GroupedItems> {
    let (Some(gender), Some(_body_type), Some(skin_undertone)) = (
        present(query.gender),
        present(query.body_type),
        present(query.skin_undertone),
    ) else {
        return Err(AppError::Validation(
            "Missing profile information".to_string(),
        ));
    };

    let keys = candidate_keys(&table.lookup(gender, skin_undertone));

    let items = db.find_clothing_items(&keys).await?;

    tracing::debug!(
        gender,
        skin_undertone,
        candidates = keys.len(),
        matched = items.len(),
        "Resolved recommendations"
    );

    Ok(group_by_category(items))
}

/// Distinct catalog keys for every recommended name.
///
/// A name listed under several categories is queried once, so each
/// matching catalog item is returned once.
pub fn candidate_keys(names: &RecommendationMap) -> Vec<String> {
    names
        .values()
        .flatten()
        .map(|n| name_key(n))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Group items by their own stored `category`, preserving query order within a group.
pub fn group_by_category(items: Vec<ClothingItem>) -> GroupedItems {
    let mut grouped = GroupedItems::new();
    for item in items {
        grouped
            .entry(item.category.clone())
            .or_default()
            .push(item.into());
    }
    grouped
}

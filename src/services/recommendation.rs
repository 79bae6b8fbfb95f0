// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static recommendation table: (gender, skin undertone) -> category -> item names.

use crate::models::RecommendationMap;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Table compiled into the binary.
const BUILTIN_TABLE: &str = include_str!("../../data/recommendations.json");

/// Skin undertone bucket. Anything that is not warm or cool is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undertone {
    Warm,
    Cool,
    Neutral,
}

impl Undertone {
    /// Classify a free-form undertone string (case-insensitive).
    pub fn classify(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "warm" => Undertone::Warm,
            "cool" => Undertone::Cool,
            _ => Undertone::Neutral,
        }
    }
}

/// One category row with its three curated lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecommendations {
    pub name: String,
    #[serde(default)]
    pub female_only: bool,
    pub warm: Vec<String>,
    pub cool: Vec<String>,
    pub neutral: Vec<String>,
}

impl CategoryRecommendations {
    fn for_undertone(&self, undertone: Undertone) -> &[String] {
        match undertone {
            Undertone::Warm => &self.warm,
            Undertone::Cool => &self.cool,
            Undertone::Neutral => &self.neutral,
        }
    }
}

#[derive(Deserialize)]
struct TableFile {
    categories: Vec<CategoryRecommendations>,
}

/// Immutable lookup table, built once at startup and shared by all requests.
#[derive(Debug, Clone)]
pub struct RecommendationTable {
    categories: Vec<CategoryRecommendations>,
}

impl RecommendationTable {
    /// The table shipped with the binary.
    pub fn builtin() -> Result<Self, RecommendationError> {
        Self::load_from_json(BUILTIN_TABLE)
    }

    /// Load a table from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RecommendationError> {
        let json_data = fs::read_to_string(path.as_ref())
            .map_err(|e| RecommendationError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load and validate a table from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, RecommendationError> {
        let file: TableFile = serde_json::from_str(json_data)
            .map_err(|e| RecommendationError::ParseError(e.to_string()))?;

        let mut seen = HashSet::new();
        for category in &file.categories {
            if category.name.trim().is_empty() {
                return Err(RecommendationError::Invalid(
                    "category with empty name".to_string(),
                ));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(RecommendationError::Invalid(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
            if category.warm.is_empty() || category.cool.is_empty() || category.neutral.is_empty()
            {
                return Err(RecommendationError::Invalid(format!(
                    "category '{}' is missing an undertone list",
                    category.name
                )));
            }
        }

        tracing::info!(count = file.categories.len(), "Loaded recommendation table");
        Ok(Self {
            categories: file.categories,
        })
    }

    pub fn categories(&self) -> &[CategoryRecommendations] {
        &self.categories
    }

    /// Item names per category for this gender and undertone.
    ///
    /// Pure: depends only on whether `gender` is "female" and on the undertone
    /// bucket, both compared case-insensitively. Callers must reject empty
    /// inputs beforehand.
    pub fn lookup(&self, gender: &str, skin_undertone: &str) -> RecommendationMap {
        let is_female = gender.to_lowercase() == "female";
        let undertone = Undertone::classify(skin_undertone);

        self.categories
            .iter()
            .filter(|c| is_female || !c.female_only)
            .map(|c| (c.name.clone(), c.for_undertone(undertone).to_vec()))
            .collect()
    }
}

/// Errors from loading a recommendation table.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse recommendation table: {0}")]
    ParseError(String),

    #[error("Invalid recommendation table: {0}")]
    Invalid(String),
}

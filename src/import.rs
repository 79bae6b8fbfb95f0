// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Parsers for the catalog maintenance files.
//!
//! - Catalog CSV with a `name,category,url` header.
//! - Plain text of image URLs separated by newlines or commas.
//! - A JSON manifest of image URLs with blank attribute slots to fill in.

use crate::models::ClothingItem;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number in the file, counting the header.
    pub line: usize,
    pub message: String,
}

/// Outcome of parsing a catalog file.
#[derive(Debug, Default)]
pub struct CatalogParse {
    pub items: Vec<ClothingItem>,
    pub errors: Vec<RowError>,
}

#[derive(Deserialize)]
struct CatalogRow {
    name: Option<String>,
    category: Option<String>,
    url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse catalog rows. Bad rows are collected, not fatal.
pub fn parse_catalog_csv<R: Read>(reader: R) -> Result<CatalogParse, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in ["name", "category", "url"] {
        if !headers.iter().any(|h| h == required) {
            return Err(ImportError::MissingColumn(required));
        }
    }

    let mut parsed = CatalogParse::default();
    for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                parsed.errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };

        match (non_empty(row.name), non_empty(row.category), non_empty(row.url)) {
            (Some(name), Some(category), Some(url)) => {
                parsed.items.push(ClothingItem::new(&name, &category, &url))
            }
            _ => parsed.errors.push(RowError {
                line,
                message: "name, category and url are all required".to_string(),
            }),
        }
    }

    Ok(parsed)
}

/// URLs separated by newlines or commas, in file order.
///
/// Entries not starting with `http` (headers, notes) are dropped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|entry| entry.starts_with("http"))
        .map(str::to_string)
        .collect()
}

/// One image awaiting manual tagging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    /// 1-based position in the source file
    pub id: usize,
    #[serde(rename = "CloudinaryURL")]
    pub cloudinary_url: String,
    pub color_family: String,
    pub style_type: String,
    pub fit_balance: String,
    pub fabric_type: String,
    pub texture: String,
    pub season: String,
}

/// Manifest entries for every non-empty line, attributes left blank.
pub fn build_image_manifest(text: &str) -> Vec<ImageRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, url)| ImageRecord {
            id: index + 1,
            cloudinary_url: url.to_string(),
            color_family: String::new(),
            style_type: String::new(),
            fit_balance: String::new(),
            fabric_type: String::new(),
            texture: String::new(),
            season: String::new(),
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
}

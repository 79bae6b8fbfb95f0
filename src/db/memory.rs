// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local document store.
//!
//! Mirrors the Firestore layout closely enough to run the full API without
//! a database: users keyed by id, a unique email index, the catalog, and
//! the image URL set. Contents are lost when the process exits.

use crate::db::{email_doc_id, url_doc_id};
use crate::error::AppError;
use crate::models::{ClothingItem, ImageUrl, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, User>>,
    /// Email claim id -> user id
    emails: Arc<DashMap<String, String>>,
    items: Arc<RwLock<Vec<ClothingItem>>>,
    image_urls: Arc<DashMap<String, ImageUrl>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.value().clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let user_id = self.emails.get(&email_doc_id(email))?.value().clone();
        self.get_user(&user_id)
    }

    pub fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.emails.entry(email_doc_id(&user.email)) {
            Entry::Occupied(_) => Err(AppError::EmailTaken),
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
                self.users.insert(user.id.clone(), user.clone());
                Ok(())
            }
        }
    }

    pub fn save_user(&self, user: &User) {
        self.users.insert(user.id.clone(), user.clone());
    }

    pub fn find_clothing_items(&self, keys: &[String]) -> Result<Vec<ClothingItem>, AppError> {
        let wanted: HashSet<&str> = keys.iter().map(String::as_str).collect();
        let items = self
            .items
            .read()
            .map_err(|_| AppError::Database("catalog lock poisoned".to_string()))?;

        Ok(items
            .iter()
            .filter(|item| wanted.contains(item.name_key.as_str()))
            .cloned()
            .collect())
    }

    pub fn insert_clothing_items(&self, new_items: &[ClothingItem]) -> Result<usize, AppError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| AppError::Database("catalog lock poisoned".to_string()))?;
        items.extend_from_slice(new_items);
        Ok(new_items.len())
    }

    pub fn insert_image_url(&self, url: &str) -> bool {
        match self.image_urls.entry(url_doc_id(url)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(ImageUrl {
                    url: url.to_string(),
                });
                true
            }
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it. They are skipped otherwise.
//!
//! The emulator state is shared across tests, so every test uses unique
//! emails, names and URLs.

use std::collections::BTreeMap;

use forma_api::db::Database;
use forma_api::error::AppError;
use forma_api::models::clothing::name_key;
use forma_api::models::{ClothingItem, Gender, Measurements, User};

mod common;
use common::test_firestore;

/// Unique suffix for test isolation.
fn unique() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Helper to create a basic test user
fn test_user(email: &str) -> User {
    let now = chrono::Utc::now().to_rfc3339();
    User {
        id: uuid::Uuid::new_v4().to_string(),
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "$2b$12$not-a-real-hash".to_string(),
        gender: Gender::Female,
        body_type: None,
        skin_undertone: None,
        measurements: Measurements::default(),
        selected_outfit: BTreeMap::new(),
        is_profile_complete: false,
        created_at: now.clone(),
        updated_at: now,
    }
}

async fn test_db() -> Database {
    Database::Firestore(test_firestore().await)
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_roundtrip_by_id_and_email() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", unique());
    let user = test_user(&email);

    assert!(db.get_user(&user.id).await.unwrap().is_none());
    assert!(db.find_user_by_email(&email).await.unwrap().is_none());

    db.create_user(&user).await.unwrap();

    assert_eq!(db.get_user(&user.id).await.unwrap(), Some(user.clone()));
    assert_eq!(db.find_user_by_email(&email).await.unwrap(), Some(user));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", unique());
    let first = test_user(&email);
    let second = test_user(&email);

    db.create_user(&first).await.unwrap();
    let result = db.create_user(&second).await;

    assert!(matches!(result, Err(AppError::EmailTaken)));
    // The losing record must not have been written.
    assert!(db.get_user(&second.id).await.unwrap().is_none());
    assert_eq!(
        db.find_user_by_email(&email).await.unwrap().map(|u| u.id),
        Some(first.id)
    );
}

#[tokio::test]
async fn test_concurrent_creates_one_winner() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", unique());

    let users: Vec<User> = (0..4).map(|_| test_user(&email)).collect();
    let results = futures_util::future::join_all(users.iter().map(|u| db.create_user(u))).await;

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, AppError::EmailTaken)));
}

#[tokio::test]
async fn test_save_user_updates_profile() {
    require_emulator!();

    let db = test_db().await;
    let mut user = test_user(&format!("{}@example.com", unique()));
    db.create_user(&user).await.unwrap();

    user.body_type = Some("Pear".to_string());
    user.measurements.waist = Some(71.0);
    user.selected_outfit
        .insert("Shirts".to_string(), "Navy polo".to_string());
    db.save_user(&user).await.unwrap();

    let stored = db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.body_type.as_deref(), Some("Pear"));
    assert_eq!(stored.measurements.waist, Some(71.0));
    assert_eq!(stored.selected_outfit["Shirts"], "Navy polo");
}

// ═══════════════════════════════════════════════════════════════════════════
// CATALOG TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_catalog_lookup_ignores_case() {
    require_emulator!();

    let db = test_db().await;
    let tag = unique();
    let stored_name = format!("MUSTARD Sweater {}", tag.to_uppercase());
    let query_name = format!("mustard sweater {}", tag);

    let inserted = db
        .insert_clothing_items(&[ClothingItem::new(
            &stored_name,
            "Sweaters & Knits",
            "https://img/mustard.jpg",
        )])
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let found = db.find_clothing_items(&[name_key(&query_name)]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, stored_name);
    assert_eq!(found[0].category, "Sweaters & Knits");

    // A prefix of the stored name is not a match.
    let partial = db
        .find_clothing_items(&[name_key("mustard sweater")])
        .await
        .unwrap();
    assert!(partial.iter().all(|item| item.name != stored_name));
}

#[tokio::test]
async fn test_catalog_lookup_more_keys_than_one_chunk() {
    require_emulator!();

    let db = test_db().await;
    let tag = unique();
    let items: Vec<ClothingItem> = (0..45)
        .map(|i| {
            ClothingItem::new(
                &format!("Item {i} {tag}"),
                "Shirts",
                &format!("https://img/{tag}/{i}.jpg"),
            )
        })
        .collect();
    db.insert_clothing_items(&items).await.unwrap();

    let keys: Vec<String> = items.iter().map(|item| item.name_key.clone()).collect();
    let found = db.find_clothing_items(&keys).await.unwrap();
    assert_eq!(found.len(), 45);
}

#[tokio::test]
async fn test_catalog_lookup_repeated_key_across_chunks() {
    require_emulator!();

    let db = test_db().await;
    let tag = unique();
    let item = ClothingItem::new(&format!("Repeat {tag}"), "Shirts", "https://img/r.jpg");
    db.insert_clothing_items(std::slice::from_ref(&item)).await.unwrap();

    // Same key at index 0 and 30 would land in two IN queries.
    let mut keys = vec![item.name_key.clone()];
    keys.extend((1..30).map(|i| format!("absent {i} {tag}")));
    keys.push(item.name_key.clone());

    let found = db.find_clothing_items(&keys).await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_catalog_lookup_empty_keys() {
    require_emulator!();

    let db = test_db().await;
    assert!(db.find_clothing_items(&[]).await.unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// IMAGE URL TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_image_url_deduplicated() {
    require_emulator!();

    let db = test_db().await;
    let url = format!("https://img.example.com/{}/look.jpg?w=400", unique());

    assert!(db.insert_image_url(&url).await.unwrap());
    assert!(!db.insert_image_url(&url).await.unwrap());
}

#[tokio::test]
async fn test_ping() {
    require_emulator!();

    test_db().await.ping().await.unwrap();
}

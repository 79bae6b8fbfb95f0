// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod clothing;
pub mod user;

pub use clothing::{ClothingItem, GroupedItems, ImageUrl, RecommendationMap, RecommendedItem};
pub use user::{Gender, Measurements, ProfileUpdate, User, UserResponse};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! FORMA: clothing recommendations from a user's profile.
//!
//! This crate provides the backend API for account signup and login,
//! profile storage, and catalog recommendations keyed by gender and skin
//! undertone.

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::RecommendationTable;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub recommendations: RecommendationTable,
}

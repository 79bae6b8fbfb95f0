// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{ProfileUpdate, UserResponse};
use crate::services::accounts::AccountService;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Profile routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/user/profile", get(get_profile).put(update_profile))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserResponse,
}

/// Get current user profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = AccountService::new(&state.db, &state.config.jwt_signing_key)
        .profile(&user.user_id)
        .await?;

    Ok(Json(ProfileResponse {
        success: true,
        message: None,
        user: profile,
    }))
}

/// Update profile fields. `email` and `password` in the body are ignored.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<ProfileResponse>> {
    let Json(update) = body?;

    let updated = AccountService::new(&state.db, &state.config.jwt_signing_key)
        .update_profile(&user.user_id, update)
        .await?;

    tracing::info!(user_id = %updated.id, "Profile updated");

    Ok(Json(ProfileResponse {
        success: true,
        message: Some("Profile updated successfully".to_string()),
        user: updated.into(),
    }))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::UserResponse;
use crate::services::accounts::{AccountService, NewAccount, Session};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/request-reset", post(request_reset))
        .route("/api/auth/reset-password", post(reset_password))
}

/// Session response for signup and login.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(session: Session, message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            token: session.token,
            user: session.user,
        }
    }
}

/// Plain success acknowledgement.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct SignupRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    gender: Option<String>,
}

/// Create an account and return a session.
async fn signup(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let Json(req) = body?;
    tracing::info!(email = ?req.email, gender = ?req.gender, "Signup");

    let account = NewAccount::parse(
        req.name.as_deref(),
        req.email.as_deref(),
        req.password.as_deref(),
        req.gender.as_deref(),
    )?;

    let session = AccountService::new(&state.db, &state.config.jwt_signing_key)
        .signup(account)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(session, "Account created successfully")),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// Check credentials and return a session.
async fn login(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let Json(req) = body?;

    let (Some(email), Some(password)) = (
        req.email.filter(|v| !v.trim().is_empty()),
        req.password.filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let session = AccountService::new(&state.db, &state.config.jwt_signing_key)
        .login(&email, &password)
        .await?;

    Ok(Json(AuthResponse::new(session, "Login successful")))
}

#[derive(Deserialize)]
pub struct RequestResetRequest {
    email: Option<String>,
}

/// Confirm the email is registered before the client shows the reset form.
async fn request_reset(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<RequestResetRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(req) = body?;
    let email = req
        .email
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".to_string()))?;

    AccountService::new(&state.db, &state.config.jwt_signing_key)
        .request_reset(&email)
        .await?;

    Ok(Json(MessageResponse::ok("Proceed to reset password")))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    email: Option<String>,
    new_password: Option<String>,
}

/// Set a new password for an email address.
async fn reset_password(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(req) = body?;

    let (Some(email), Some(new_password)) = (
        req.email.filter(|v| !v.trim().is_empty()),
        req.new_password.filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Email and new password required".to_string(),
        ));
    };

    AccountService::new(&state.db, &state.config.jwt_signing_key)
        .reset_password_unverified(&email, &new_password)
        .await?;

    Ok(Json(MessageResponse::ok("Password reset successfully")))
}

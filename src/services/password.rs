// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-way password hashing (bcrypt).

use crate::error::{AppError, Result};
use anyhow::Context;

/// bcrypt work factor.
pub const HASH_COST: u32 = 12;

/// Minimum accepted password length, checked before hashing.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Reject passwords shorter than the minimum.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Hash a password. Runs on the blocking pool since bcrypt is CPU-bound.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
        .await
        .context("password hashing task failed")?
        .context("password hashing failed")?;
    Ok(hash)
}

/// Compare a candidate password against a stored hash.
///
/// A malformed stored hash counts as a mismatch rather than a server error.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?;

    Ok(matches.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored password hash is malformed");
        false
    }))
}

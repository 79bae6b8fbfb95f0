// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account service: signup, login, password reset, and profile management.
//!
//! Every operation is a single request with no cross-request state. The
//! store's unique email constraint backs up the signup existence check.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::{Gender, ProfileUpdate, User, UserResponse};
use crate::services::password::{hash_password, validate_password, verify_password};
use crate::time_utils::now_rfc3339;
use regex::Regex;
use std::sync::LazyLock;
use validator::Validate;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII word characters only.
    Regex::new(r"(?-u)^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$").expect("email pattern is valid")
});

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validated signup input (already normalized).
#[derive(Debug, Validate)]
pub struct NewAccount {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(regex(path = *EMAIL_RE, message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub gender: Gender,
}

impl NewAccount {
    /// Build from raw request fields. Every field must be present and non-empty.
    pub fn parse(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        gender: Option<&str>,
    ) -> Result<Self> {
        let (Some(name), Some(email), Some(password), Some(gender)) = (
            name.filter(|v| !v.trim().is_empty()),
            email.filter(|v| !v.trim().is_empty()),
            password.filter(|v| !v.is_empty()),
            gender.filter(|v| !v.trim().is_empty()),
        ) else {
            return Err(AppError::Validation("All fields are required".to_string()));
        };

        let gender = Gender::parse(gender.trim())
            .ok_or_else(|| AppError::Validation("Gender must be Male or Female".to_string()))?;

        let account = Self {
            name: name.trim().to_string(),
            email: normalize_email(email),
            password: password.to_string(),
            gender,
        };

        account
            .validate()
            .map_err(|e| AppError::Validation(first_message(&e)))?;

        Ok(account)
    }
}

/// First human-readable message from a validator error set.
fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserResponse,
}

/// Account operations over the shared store and signing key.
pub struct AccountService<'a> {
    db: &'a Database,
    signing_key: &'a [u8],
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a Database, signing_key: &'a [u8]) -> Self {
        Self { db, signing_key }
    }

    fn issue_session(&self, user: User) -> Result<Session> {
        let token = create_jwt(&user.id, self.signing_key)?;
        Ok(Session {
            token,
            user: user.into(),
        })
    }

    // ─── Credential Store ────────────────────────────────────────

    /// Create a user with a hashed password.
    pub async fn create(&self, account: NewAccount) -> Result<User> {
        let password_hash = hash_password(&account.password).await?;
        let now = now_rfc3339();

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: account.name,
            email: account.email,
            password_hash,
            gender: account.gender,
            body_type: None,
            skin_undertone: None,
            measurements: Default::default(),
            selected_outfit: Default::default(),
            is_profile_complete: false,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.create_user(&user).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.db.find_user_by_email(&normalize_email(email)).await
    }

    /// Apply a partial profile update. Email and password cannot change here.
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Name cannot be empty".to_string()));
            }
        }
        if let Some(measurements) = &update.measurements {
            if !measurements.is_valid() {
                return Err(AppError::Validation(
                    "Measurements must be non-negative numbers".to_string(),
                ));
            }
        }

        let mut user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        update.apply_to(&mut user);
        user.updated_at = now_rfc3339();

        self.db.save_user(&user).await?;
        Ok(user)
    }

    /// Replace the password of the account with this email.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<User> {
        validate_password(new_password)?;

        let mut user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.password_hash = hash_password(new_password).await?;
        user.updated_at = now_rfc3339();

        self.db.save_user(&user).await?;
        Ok(user)
    }

    // ─── Orchestration ───────────────────────────────────────────

    /// Register an account and open a session for it.
    pub async fn signup(&self, account: NewAccount) -> Result<Session> {
        if self.db.find_user_by_email(&account.email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let user = self.create(account).await?;
        tracing::info!(user_id = %user.id, email = %user.email, "User created");

        self.issue_session(user)
    }

    /// Check credentials and open a session.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let Some(user) = self.find_by_email(email).await? else {
            tracing::info!("Login failed");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, "Login failed");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "Login successful");
        self.issue_session(user)
    }

    /// Confirm an account exists before a reset.
    ///
    /// Unlike login, this reports unknown emails as 404, which discloses
    /// whether an address is registered. No reset mail is sent.
    pub async fn request_reset(&self, email: &str) -> Result<()> {
        if self.find_by_email(email).await?.is_none() {
            return Err(AppError::NotFound("Email not found".to_string()));
        }
        tracing::info!(email = %normalize_email(email), "Password reset requested");
        Ok(())
    }

    /// Reset a password with no proof of ownership.
    ///
    /// Anyone who knows the email can take over the account. Kept for the
    /// demo client until emailed reset tokens exist.
    pub async fn reset_password_unverified(&self, email: &str, new_password: &str) -> Result<()> {
        let user = self.reset_password(email, new_password).await?;
        tracing::warn!(user_id = %user.id, "Password reset without ownership verification");
        Ok(())
    }

    /// Public view of a user by ID.
    pub async fn profile(&self, user_id: &str) -> Result<UserResponse> {
        self.db
            .get_user(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_email() {
        let account = NewAccount::parse(
            Some(" Ada "),
            Some("  Ada@Example.COM "),
            Some("secret123"),
            Some("Female"),
        )
        .unwrap();
        assert_eq!(account.email, "ada@example.com");
        assert_eq!(account.name, "Ada");
        assert_eq!(account.gender, Gender::Female);
    }

    #[test]
    fn test_parse_requires_all_fields() {
        let result = NewAccount::parse(Some("Ada"), None, Some("secret123"), Some("Female"));
        assert!(matches!(result, Err(AppError::Validation(m)) if m == "All fields are required"));

        let result = NewAccount::parse(Some("  "), Some("a@b.co"), Some("secret123"), Some("Male"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_parse_rejects_bad_email_and_gender_and_short_password() {
        assert!(NewAccount::parse(Some("A"), Some("not-an-email"), Some("secret123"), Some("Male")).is_err());
        assert!(NewAccount::parse(Some("A"), Some("a@b.co"), Some("secret123"), Some("male")).is_err());
        assert!(NewAccount::parse(Some("A"), Some("a@b.co"), Some("12345"), Some("Male")).is_err());
    }

    #[test]
    fn test_email_pattern() {
        for ok in ["a@b.co", "first.last@mail.example.com", "x-y_z@d-o.info"] {
            assert!(EMAIL_RE.is_match(ok), "{ok} should match");
        }
        for bad in [
            "a@b",
            "@b.com",
            "a b@c.com",
            "a@b.toolong",
            "ünï@exämple.com",
            "user@mail.exämple.com",
        ] {
            assert!(!EMAIL_RE.is_match(bad), "{bad} should not match");
        }
    }

    #[tokio::test]
    async fn test_create_stores_hash_not_plaintext() {
        let db = Database::in_memory();
        let service = AccountService::new(&db, b"key");
        let account =
            NewAccount::parse(Some("Ada"), Some("ada@example.com"), Some("secret123"), Some("Female"))
                .unwrap();

        let user = service.create(account).await.unwrap();
        let stored = db.get_user(&user.id).await.unwrap().unwrap();

        assert_ne!(stored.password_hash, "secret123");
        assert!(verify_password("secret123", &stored.password_hash).await.unwrap());
        assert!(!verify_password("secret12", &stored.password_hash).await.unwrap());
    }
}

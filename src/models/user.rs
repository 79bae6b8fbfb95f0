// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Gender accepted at signup. Drives the female-only recommendation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Parse the exact stored spelling (`Male` / `Female`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body measurements. Units are whatever the client collects (cm/kg in the app).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Measurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bust: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hips: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoulder: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrist: Option<f64>,
}

impl Measurements {
    /// Every present value must be a finite, non-negative number.
    pub fn is_valid(&self) -> bool {
        [
            self.height,
            self.weight,
            self.bust,
            self.waist,
            self.hips,
            self.shoulder,
            self.chest,
            self.wrist,
        ]
        .iter()
        .flatten()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// User account stored in Firestore (document ID is `id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Generated UUID
    pub id: String,
    pub name: String,
    /// Trimmed, lowercased
    pub email: String,
    /// bcrypt hash; never the plaintext
    pub password_hash: String,
    pub gender: Gender,
    #[serde(default)]
    pub body_type: Option<String>,
    #[serde(default)]
    pub skin_undertone: Option<String>,
    #[serde(default)]
    pub measurements: Measurements,
    /// Category name -> chosen item name
    #[serde(default)]
    pub selected_outfit: BTreeMap<String, String>,
    #[serde(default)]
    pub is_profile_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub body_type: Option<String>,
    pub skin_undertone: Option<String>,
    pub measurements: Measurements,
    pub selected_outfit: BTreeMap<String, String>,
    pub is_profile_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            gender: user.gender,
            body_type: user.body_type,
            skin_undertone: user.skin_undertone,
            measurements: user.measurements,
            selected_outfit: user.selected_outfit,
            is_profile_complete: user.is_profile_complete,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Partial profile update.
///
/// Only the fields listed here can change through the profile endpoint.
/// `email` and `password` have no field, so serde drops them from the body.
/// For nullable fields, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "double_option")]
    pub body_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub skin_undertone: Option<Option<String>>,
    pub measurements: Option<Measurements>,
    pub selected_outfit: Option<BTreeMap<String, String>>,
    pub is_profile_complete: Option<bool>,
}

impl ProfileUpdate {
    /// Apply present fields onto `user`. Identity and credentials are untouched.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(gender) = self.gender {
            user.gender = gender;
        }
        if let Some(body_type) = self.body_type {
            user.body_type = body_type;
        }
        if let Some(skin_undertone) = self.skin_undertone {
            user.skin_undertone = skin_undertone;
        }
        if let Some(measurements) = self.measurements {
            user.measurements = measurements;
        }
        if let Some(selected_outfit) = self.selected_outfit {
            user.selected_outfit = selected_outfit;
        }
        if let Some(complete) = self.is_profile_complete {
            user.is_profile_complete = complete;
        }
    }
}

/// Distinguish an explicit `null` from an absent field.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            gender: Gender::Female,
            body_type: Some("Hourglass".to_string()),
            skin_undertone: Some("Warm".to_string()),
            measurements: Measurements::default(),
            selected_outfit: BTreeMap::new(),
            is_profile_complete: false,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_profile_update_ignores_credentials() {
        let update: ProfileUpdate = serde_json::from_value(serde_json::json!({
            "email": "evil@example.com",
            "password": "hijacked",
            "bodyType": "Pear",
        }))
        .unwrap();

        let mut user = sample_user();
        update.apply_to(&mut user);

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.password_hash, "$2b$12$hash");
        assert_eq!(user.body_type.as_deref(), Some("Pear"));
    }

    #[test]
    fn test_profile_update_null_clears_absent_keeps() {
        let update: ProfileUpdate =
            serde_json::from_value(serde_json::json!({ "bodyType": null })).unwrap();

        let mut user = sample_user();
        update.apply_to(&mut user);

        assert_eq!(user.body_type, None);
        assert_eq!(user.skin_undertone.as_deref(), Some("Warm"));
    }

    #[test]
    fn test_public_view_has_no_password() {
        let json = serde_json::to_value(UserResponse::from(sample_user())).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["gender"], "Female");
    }

    #[test]
    fn test_measurements_validation() {
        let mut m = Measurements {
            height: Some(170.0),
            ..Default::default()
        };
        assert!(m.is_valid());
        m.waist = Some(-1.0);
        assert!(!m.is_valid());
        m.waist = Some(f64::NAN);
        assert!(!m.is_valid());
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The JWT secret is read once at startup; rotating it invalidates every
//! outstanding session token.

use std::env;
use std::path::PathBuf;

/// Which document store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackend {
    /// Google Cloud Firestore (or its emulator).
    Firestore,
    /// Process-local store, lost on restart. For demos and tests.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Storage backend
    pub db_backend: DbBackend,
    /// Optional JSON file replacing the built-in recommendation table
    pub recommendations_path: Option<PathBuf>,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            port: 3000,
            gcp_project_id: "test-project".to_string(),
            db_backend: DbBackend::Memory,
            recommendations_path: None,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let db_backend = match env::var("DB_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => DbBackend::Firestore,
            "memory" => DbBackend::Memory,
            other => return Err(ConfigError::Invalid("DB_BACKEND", other.to_string())),
        };

        let jwt_signing_key = env::var("JWT_SECRET")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_signing_key.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            db_backend,
            recommendations_path: env::var("RECOMMENDATIONS_PATH").ok().map(PathBuf::from),
            jwt_signing_key: jwt_signing_key.into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases live in one test since they mutate process-wide env vars.
    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SECRET", "  env_secret  ");
        env::set_var("DB_BACKEND", "Memory");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.jwt_signing_key, b"env_secret".to_vec());
        assert_eq!(config.db_backend, DbBackend::Memory);
        assert_eq!(config.port, 3000);

        env::set_var("DB_BACKEND", "postgres");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("DB_BACKEND", _))
        ));
        env::remove_var("DB_BACKEND");
    }
}

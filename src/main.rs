// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FORMA API Server
//!
//! Accounts, profiles, and clothing recommendations for the FORMA app.

use forma_api::{config::Config, db::Database, services::RecommendationTable, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting FORMA API");

    let db = Database::connect(&config)
        .await
        .expect("Failed to connect to database");

    let recommendations = match &config.recommendations_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading recommendation table");
            RecommendationTable::load_from_file(path)
        }
        None => RecommendationTable::builtin(),
    }
    .expect("Failed to load recommendation table");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        recommendations,
    });

    // Build router
    let app = forma_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("forma_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clothing recommendation route.

use crate::error::Result;
use crate::models::GroupedItems;
use crate::services::catalog::{self, ProfileQuery};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/recommendations", get(get_recommendations))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationParams {
    gender: Option<String>,
    body_type: Option<String>,
    skin_undertone: Option<String>,
}

/// Catalog items for a profile, grouped by category.
async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<RecommendationParams>, QueryRejection>,
) -> Result<Json<GroupedItems>> {
    let Query(params) = params?;

    let query = ProfileQuery {
        gender: params.gender.as_deref(),
        body_type: params.body_type.as_deref(),
        skin_undertone: params.skin_undertone.as_deref(),
    };

    let grouped = catalog::resolve(&state.db, &state.recommendations, &query).await?;
    Ok(Json(grouped))
}

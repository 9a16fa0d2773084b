//! Client-facing query handlers

use axum::extract::{Query, State};
use axum::response::Json;
use eddy_search::{ContentItem, LatencyResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub wd: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub site_key: String,
    #[serde(default)]
    pub id: String,
}

/// Item list wrapper shared by hot and search responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<ContentItem>,
}

pub async fn api_check(
    State(state): State<AppState>,
    Query(params): Query<CheckQuery>,
) -> Json<LatencyResult> {
    Json(state.service.check(&params.key).await)
}

pub async fn api_hot(State(state): State<AppState>) -> Json<ItemsResponse> {
    Json(ItemsResponse {
        items: state.service.hot().await,
    })
}

pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<ItemsResponse> {
    Json(ItemsResponse {
        items: state.service.search(&params.wd).await,
    })
}

pub async fn api_detail(
    State(state): State<AppState>,
    Query(params): Query<DetailQuery>,
) -> Result<Json<Value>, ApiError> {
    let payload = state.service.detail(&params.site_key, &params.id).await?;
    Ok(Json(payload))
}

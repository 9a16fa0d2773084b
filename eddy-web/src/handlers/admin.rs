//! Administrative handlers: credential check and provider list management.
//!
//! Reads and writes of the provider list require the configured password in
//! the `x-admin-password` header. Without a configured password every
//! administrative request is refused.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use eddy_core::{Provider, ProviderSet};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::ApiError;
use crate::server::AppState;

/// Header carrying the administrative password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceSitesRequest {
    pub sites: Vec<Provider>,
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> (StatusCode, Json<SuccessResponse>) {
    if state.admin.verify(&request.password) {
        info!("Admin login accepted");
        (StatusCode::OK, Json(SuccessResponse { success: true }))
    } else {
        warn!("Admin login rejected");
        (StatusCode::FORBIDDEN, Json(SuccessResponse { success: false }))
    }
}

pub async fn admin_list_sites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Provider>>, ApiError> {
    authorize(&state, &headers)?;
    Ok(Json(state.service.providers().await.to_vec()))
}

pub async fn admin_replace_sites(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ReplaceSitesRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    authorize(&state, &headers)?;

    let providers = ProviderSet::new(request.sites)?;
    let count = providers.len();
    state.service.replace_providers(providers).await?;

    info!(providers = count, "Provider list replaced via admin API");
    Ok(Json(SuccessResponse { success: true }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let supplied = headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if state.admin.verify(supplied) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

//! Mapping from domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eddy_core::RegistryError;
use eddy_search::AggregationError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by API handlers, rendered as `{ "error": "..." }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure from an aggregation operation or the registry.
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    /// Missing or wrong administrative credential.
    #[error("Administrative access denied")]
    Forbidden,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Aggregation(AggregationError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Aggregation(AggregationError::Upstream { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Aggregation(AggregationError::Registry(RegistryError::DuplicateKey {
                ..
            })) => StatusCode::BAD_REQUEST,
            ApiError::Aggregation(AggregationError::Registry(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(error: RegistryError) -> Self {
        ApiError::Aggregation(AggregationError::Registry(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

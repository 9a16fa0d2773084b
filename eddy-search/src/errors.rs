//! Error types for upstream queries and aggregation.

use eddy_core::RegistryError;
use thiserror::Error;

/// Why a single upstream call produced nothing usable.
///
/// Search, hot list and probe recover from every variant locally; only the
/// detail lookup ever surfaces one to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The call did not complete within its timeout.
    #[error("Timed out after {elapsed_ms} ms")]
    Timeout {
        /// Timeout that expired
        elapsed_ms: u64,
    },

    /// Connection or transport failure.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// Provider answered with a non-success status code.
    #[error("Upstream HTTP status {status}")]
    HttpStatus {
        /// HTTP status code returned
        status: u16,
    },

    /// Response body was not the expected JSON shape.
    #[error("Parse error: {reason}")]
    Parse {
        /// The reason for the parse error
        reason: String,
    },

    /// Provider endpoint is not a usable URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Endpoint as stored in the registry
        endpoint: String,
        /// The reason the endpoint was rejected
        reason: String,
    },
}

/// Errors surfaced to callers of aggregation operations.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// No provider with the requested key exists in the registry.
    #[error("Provider not found: {key}")]
    NotFound {
        /// The key that failed to resolve
        key: String,
    },

    /// The provider was resolved but the upstream call failed.
    #[error("Provider '{key}' failed: {source}")]
    Upstream {
        /// Provider that failed
        key: String,
        /// Underlying upstream failure
        #[source]
        source: UpstreamError,
    },

    /// The provider registry could not be updated.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl AggregationError {
    /// Checks if this error is caused by the caller's input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AggregationError::NotFound { .. }
                | AggregationError::Registry(RegistryError::DuplicateKey { .. })
        )
    }
}

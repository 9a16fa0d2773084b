//! Upstream client implementations for provider endpoints.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use eddy_core::Provider;

use crate::errors::UpstreamError;
use crate::query::ProviderQuery;

pub mod http;
pub mod mock;

pub use http::HttpUpstreamClient;
#[cfg(test)]
pub use mock::{MockReply, MockUpstream};

/// Transport used to talk to provider endpoints.
///
/// Implementations perform exactly one request per call with no retries.
/// Timeouts are applied by the caller so that every aggregation path owns
/// its own bound.
#[async_trait]
pub trait UpstreamClient: Send + Sync + std::fmt::Debug {
    /// Issues `query` against `provider` and decodes the body as JSON.
    ///
    /// # Errors
    /// - `UpstreamError::Network` - Connection or transport failure
    /// - `UpstreamError::HttpStatus` - Non-success status code
    /// - `UpstreamError::Parse` - Body is not valid JSON
    /// - `UpstreamError::InvalidEndpoint` - Provider endpoint is not a URL
    async fn fetch_json(
        &self,
        provider: &Provider,
        query: &ProviderQuery,
    ) -> Result<serde_json::Value, UpstreamError>;

    /// Issues `query` against `provider` and reads the body to completion
    /// without interpreting it.
    ///
    /// # Errors
    /// - `UpstreamError::Network` - Connection or transport failure
    /// - `UpstreamError::HttpStatus` - Non-success status code
    /// - `UpstreamError::InvalidEndpoint` - Provider endpoint is not a URL
    async fn fetch_complete(
        &self,
        provider: &Provider,
        query: &ProviderQuery,
    ) -> Result<(), UpstreamError>;
}

/// Runs an upstream call under `timeout`, cancelling it on expiry.
///
/// # Errors
/// - `UpstreamError::Timeout` - `timeout` elapsed first
/// - Any error returned by the call itself
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout {
            elapsed_ms: timeout.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_slow_call() {
        let result: Result<(), _> = bounded(Duration::from_millis(100), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(UpstreamError::Timeout { elapsed_ms: 100 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_passes_through_fast_result() {
        let result = bounded(Duration::from_millis(100), async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }
}

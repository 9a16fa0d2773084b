//! Single-provider detail lookup.
//!
//! Unlike search and the hot list, detail failures are surfaced to the
//! caller: the user asked for one specific item from one specific provider
//! and has no other result to fall back on.

use std::sync::Arc;
use std::time::Duration;

use eddy_core::ProviderSet;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AggregationError;
use crate::providers::{UpstreamClient, bounded};
use crate::query::ProviderQuery;

/// Forwards detail queries to the provider that owns an item.
#[derive(Debug, Clone)]
pub struct DetailFetcher {
    client: Arc<dyn UpstreamClient>,
    timeout: Duration,
}

impl DetailFetcher {
    /// Creates a fetcher bounding each lookup by `timeout`.
    pub fn new(client: Arc<dyn UpstreamClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetches the raw detail payload for `item_id` from provider `key`.
    ///
    /// Inactive providers are still addressable here.
    ///
    /// # Errors
    /// - `AggregationError::NotFound` - No provider is registered under `key`
    /// - `AggregationError::Upstream` - Provider timed out, failed, or sent invalid JSON
    pub async fn detail(
        &self,
        providers: &ProviderSet,
        key: &str,
        item_id: &str,
    ) -> Result<Value, AggregationError> {
        let provider = providers.get(key).ok_or_else(|| AggregationError::NotFound {
            key: key.to_string(),
        })?;

        let query = ProviderQuery::Detail {
            ids: vec![item_id.to_string()],
        };

        match bounded(self.timeout, self.client.fetch_json(provider, &query)).await {
            Ok(payload) => {
                debug!(provider = key, item = item_id, "Detail fetched");
                Ok(payload)
            }
            Err(source) => {
                warn!(provider = key, item = item_id, "Detail fetch failed: {source}");
                Err(AggregationError::Upstream {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }
}

//! Provider latency probe.
//!
//! Measures the wall-clock time of one first-page listing request. Unknown
//! keys and unreachable providers both report the sentinel latency so that
//! callers ranking providers by number never have to handle an error.

use std::sync::Arc;
use std::time::Duration;

use eddy_core::ProviderSet;
use tokio::time::Instant;
use tracing::debug;

use crate::providers::{UpstreamClient, bounded};
use crate::query::ProviderQuery;
use crate::types::{LatencyResult, SENTINEL_LATENCY_MS};

/// Single-request round-trip latency probe.
#[derive(Debug, Clone)]
pub struct LatencyProbe {
    client: Arc<dyn UpstreamClient>,
    timeout: Duration,
}

impl LatencyProbe {
    /// Creates a probe that abandons each request after `timeout`.
    pub fn new(client: Arc<dyn UpstreamClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Probes the provider registered under `key`.
    ///
    /// Never retries. Returns within the probe timeout regardless of whether
    /// the provider answers.
    pub async fn probe(&self, providers: &ProviderSet, key: &str) -> LatencyResult {
        let Some(provider) = providers.get(key) else {
            debug!(provider = key, "Probe requested for unknown provider");
            return LatencyResult::unreachable(key);
        };

        let start = Instant::now();
        let outcome = bounded(
            self.timeout,
            self.client.fetch_complete(provider, &ProviderQuery::Probe),
        )
        .await;

        match outcome {
            Ok(()) => {
                // Keep real measurements distinguishable from the sentinel.
                let latency_ms = (start.elapsed().as_millis() as u64).min(SENTINEL_LATENCY_MS - 1);
                debug!(provider = key, latency_ms, "Probe succeeded");
                LatencyResult {
                    provider_key: key.to_string(),
                    latency_ms,
                }
            }
            Err(e) => {
                debug!(provider = key, "Probe failed: {e}");
                LatencyResult::unreachable(key)
            }
        }
    }
}

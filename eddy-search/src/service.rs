//! Aggregation service facade.
//!
//! Owns the registry handle and one instance of each aggregation component.
//! Every operation takes a fresh registry snapshot at its start and works on
//! that snapshot only.

use std::sync::Arc;

use eddy_core::config::UpstreamConfig;
use eddy_core::{ProviderRegistry, ProviderSet};
use serde_json::Value;

use crate::detail::DetailFetcher;
use crate::errors::{AggregationError, UpstreamError};
use crate::hot::HotListAggregator;
use crate::probe::LatencyProbe;
use crate::providers::{HttpUpstreamClient, UpstreamClient};
use crate::search::SearchAggregator;
use crate::types::{ContentItem, LatencyResult};

/// Entry point for every client-facing query operation.
#[derive(Debug, Clone)]
pub struct AggregationService {
    registry: Arc<dyn ProviderRegistry>,
    probe: LatencyProbe,
    hot: HotListAggregator,
    search: SearchAggregator,
    detail: DetailFetcher,
}

impl AggregationService {
    /// Creates a service on top of an arbitrary upstream transport.
    pub fn new(
        config: &UpstreamConfig,
        registry: Arc<dyn ProviderRegistry>,
        client: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            registry,
            probe: LatencyProbe::new(client.clone(), config.probe_timeout),
            hot: HotListAggregator::new(client.clone(), config),
            search: SearchAggregator::new(client.clone(), config.search_timeout),
            detail: DetailFetcher::new(client, config.detail_timeout),
        }
    }

    /// Creates a service that talks to providers over HTTP.
    ///
    /// # Errors
    /// - `UpstreamError::Network` - HTTP client could not be initialised
    pub fn with_http(
        config: &UpstreamConfig,
        registry: Arc<dyn ProviderRegistry>,
    ) -> Result<Self, UpstreamError> {
        let client = HttpUpstreamClient::new(config)?;
        Ok(Self::new(config, registry, Arc::new(client)))
    }

    /// Measures the round-trip latency of provider `key`.
    pub async fn check(&self, key: &str) -> LatencyResult {
        let providers = self.registry.list().await;
        self.probe.probe(&providers, key).await
    }

    /// Returns the hot list from the first preferred provider that has one.
    pub async fn hot(&self) -> Vec<ContentItem> {
        let providers = self.registry.list().await;
        self.hot.hot_list(&providers).await
    }

    /// Searches all active providers concurrently.
    pub async fn search(&self, query: &str) -> Vec<ContentItem> {
        let providers = self.registry.list().await;
        self.search.search(&providers, query).await
    }

    /// Fetches the raw detail payload for one item.
    ///
    /// # Errors
    /// - `AggregationError::NotFound` - Unknown provider key
    /// - `AggregationError::Upstream` - Provider failed or timed out
    pub async fn detail(&self, key: &str, item_id: &str) -> Result<Value, AggregationError> {
        let providers = self.registry.list().await;
        self.detail.detail(&providers, key, item_id).await
    }

    /// Returns the full provider set, including inactive providers.
    pub async fn providers(&self) -> ProviderSet {
        self.registry.list().await
    }

    /// Replaces the full provider set.
    ///
    /// # Errors
    /// - `AggregationError::Registry` - The new set could not be stored; the
    ///   previous set stays in effect
    pub async fn replace_providers(&self, providers: ProviderSet) -> Result<(), AggregationError> {
        self.registry.replace_all(providers).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use eddy_core::{InMemoryRegistry, Provider};

    use super::*;
    use crate::providers::{MockReply, MockUpstream};

    fn service(mock: MockUpstream, providers: ProviderSet) -> (AggregationService, Arc<MockUpstream>) {
        let mock = Arc::new(mock);
        let registry = Arc::new(InMemoryRegistry::new(providers));
        (
            AggregationService::new(&UpstreamConfig::default(), registry, mock.clone()),
            mock,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_is_seen_by_next_request() {
        let initial = ProviderSet::new(vec![Provider::new("a", "Alpha", "https://a.test")]).unwrap();
        let (service, mock) = service(
            MockUpstream::new()
                .with("a", MockReply::items(1))
                .with("b", MockReply::items(2)),
            initial,
        );

        assert_eq!(service.search("x").await.len(), 1);

        let replacement =
            ProviderSet::new(vec![Provider::new("b", "Beta", "https://b.test")]).unwrap();
        service.replace_providers(replacement).await.unwrap();

        let items = service.search("x").await;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.origin_provider_key == "b"));
        assert_eq!(mock.call_count("a"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_search_keeps_its_snapshot() {
        let initial = ProviderSet::new(vec![
            Provider::new("a", "Alpha", "https://a.test"),
            Provider::new("b", "Beta", "https://b.test"),
        ])
        .unwrap();
        let (service, mock) = service(
            MockUpstream::new()
                .with("a", MockReply::items(1).after(Duration::from_millis(200)))
                .with("b", MockReply::items(1).after(Duration::from_millis(200))),
            initial,
        );

        let in_flight = {
            let service = service.clone();
            tokio::spawn(async move { service.search("x").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        service.replace_providers(ProviderSet::default()).await.unwrap();

        let items = in_flight.await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(service.search("x").await.is_empty());
        assert_eq!(mock.total_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_uses_current_registry() {
        let (service, _mock) = service(
            MockUpstream::new().with("a", MockReply::items(1)),
            ProviderSet::new(vec![Provider::new("a", "Alpha", "https://a.test")]).unwrap(),
        );

        assert!(service.check("a").await.is_reachable());
        assert!(!service.check("zzz").await.is_reachable());
    }
}

//! Concurrent multi-provider search.
//!
//! One keyword query goes to every active provider at once. Each branch is
//! bounded by its own timeout and turns any failure into "no contribution",
//! so the aggregate completes in roughly the time of the slowest branch and
//! never fails as a whole.

use std::sync::Arc;
use std::time::Duration;

use eddy_core::{Provider, ProviderSet};
use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::errors::UpstreamError;
use crate::providers::{UpstreamClient, bounded};
use crate::query::ProviderQuery;
use crate::types::{ContentItem, extract_list};

/// What a single provider added to a search.
#[derive(Debug)]
pub enum Contribution {
    /// Provider answered with a list (possibly empty).
    Items(Vec<ContentItem>),
    /// Provider timed out, failed, or sent an unusable payload.
    Nothing(UpstreamError),
}

/// Fan-out search across all active providers.
#[derive(Debug, Clone)]
pub struct SearchAggregator {
    client: Arc<dyn UpstreamClient>,
    timeout: Duration,
}

impl SearchAggregator {
    /// Creates an aggregator bounding each provider call by `timeout`.
    pub fn new(client: Arc<dyn UpstreamClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Searches every active provider for `query` and merges the results.
    ///
    /// Items are concatenated in registry order of their providers, each
    /// provider's own ordering preserved. A blank query returns an empty
    /// list without contacting anyone.
    pub async fn search(&self, providers: &ProviderSet, query: &str) -> Vec<ContentItem> {
        let keyword = query.trim();
        if keyword.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let active: Vec<&Provider> = providers.active().collect();

        // join_all yields outputs in input order, not completion order.
        let contributions = join_all(
            active
                .iter()
                .map(|provider| self.search_provider(provider, keyword)),
        )
        .await;

        let mut merged = Vec::new();
        let mut responded = 0usize;
        for (provider, contribution) in active.iter().zip(contributions) {
            match contribution {
                Contribution::Items(items) => {
                    responded += 1;
                    debug!(provider = %provider.key, items = items.len(), "Search provider answered");
                    merged.extend(items);
                }
                Contribution::Nothing(e) => {
                    debug!(provider = %provider.key, "Search provider contributed nothing: {e}");
                }
            }
        }

        info!(
            query = keyword,
            providers = active.len(),
            responded,
            items = merged.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        merged
    }

    /// Runs one provider branch. Never fails.
    pub async fn search_provider(&self, provider: &Provider, keyword: &str) -> Contribution {
        let query = ProviderQuery::Search {
            keyword: keyword.to_string(),
        };

        let payload = match bounded(self.timeout, self.client.fetch_json(provider, &query)).await {
            Ok(payload) => payload,
            Err(e) => return Contribution::Nothing(e),
        };

        match extract_list(&payload) {
            Some(list) => Contribution::Items(
                list.into_iter()
                    .map(|fields| ContentItem::from_provider(fields, provider))
                    .collect(),
            ),
            None => Contribution::Nothing(UpstreamError::Parse {
                reason: "payload has no list or data array".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::providers::{MockReply, MockUpstream};
    use crate::types::SENTINEL_LATENCY_MS;

    fn abc() -> ProviderSet {
        ProviderSet::new(vec![
            Provider::new("a", "Alpha", "https://a.test"),
            Provider::new("b", "Beta", "https://b.test"),
            Provider::new("c", "Gamma", "https://c.test"),
        ])
        .unwrap()
    }

    fn aggregator(mock: &Arc<MockUpstream>) -> SearchAggregator {
        SearchAggregator::new(mock.clone(), Duration::from_millis(6000))
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_contacts_nobody() {
        let mock = Arc::new(MockUpstream::new().with("a", MockReply::items(3)));

        assert!(aggregator(&mock).search(&abc(), "").await.is_empty());
        assert!(aggregator(&mock).search(&abc(), "   ").await.is_empty());
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merges_in_registry_order_despite_arrival_order() {
        let mock = Arc::new(
            MockUpstream::new()
                .with("a", MockReply::items(3).after(Duration::from_millis(500)))
                .with("b", MockReply::hang())
                .with("c", MockReply::items(2).after(Duration::from_millis(10))),
        );

        let items = aggregator(&mock).search(&abc(), "matrix").await;

        assert_eq!(items.len(), 5);
        let origins: Vec<&str> = items.iter().map(|i| i.origin_provider_key.as_str()).collect();
        assert_eq!(origins, vec!["a", "a", "a", "c", "c"]);
        assert_eq!(items[0].origin_provider_name, "Alpha");
        assert_eq!(items[3].origin_provider_name, "Gamma");
        assert_eq!(items[1].field("vod_id"), Some(&json!(1)));
        assert!(items.iter().all(|i| i.latency == SENTINEL_LATENCY_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_is_concurrent() {
        let mock = Arc::new(
            MockUpstream::new()
                .with("a", MockReply::items(1).after(Duration::from_millis(1000)))
                .with("b", MockReply::items(1).after(Duration::from_millis(2000)))
                .with("c", MockReply::items(1).after(Duration::from_millis(3000))),
        );

        let start = Instant::now();
        let items = aggregator(&mock).search(&abc(), "matrix").await;
        let elapsed = start.elapsed();

        assert_eq!(items.len(), 3);
        // max(latencies) = 3s, sum(latencies) = 6s
        assert!(elapsed >= Duration::from_millis(3000));
        assert!(elapsed < Duration::from_millis(3500), "took {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_failure_bounded_by_one_timeout() {
        let mock = Arc::new(
            MockUpstream::new()
                .with("a", MockReply::hang())
                .with("b", MockReply::hang())
                .with("c", MockReply::hang()),
        );

        let start = Instant::now();
        let items = aggregator(&mock).search(&abc(), "matrix").await;

        assert!(items.is_empty());
        assert!(start.elapsed() < Duration::from_millis(6100));
        assert_eq!(mock.total_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_and_failed_providers_dropped() {
        let mock = Arc::new(
            MockUpstream::new()
                .with("a", MockReply::json(json!({"code": 0, "msg": "no list here"})))
                .with("b", MockReply::error(UpstreamError::HttpStatus { status: 500 }))
                .with("c", MockReply::json(json!({"data": [{"vod_id": 9}]}))),
        );

        let items = aggregator(&mock).search(&abc(), "matrix").await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].origin_provider_key, "c");
    }

    #[tokio::test(start_paused = true)]
    async fn test_inactive_providers_not_queried() {
        let set = ProviderSet::new(vec![
            Provider::new("a", "Alpha", "https://a.test"),
            Provider::new("b", "Beta", "https://b.test").with_active(false),
        ])
        .unwrap();
        let mock = Arc::new(
            MockUpstream::new()
                .with("a", MockReply::items(1))
                .with("b", MockReply::items(1)),
        );

        let items = aggregator(&mock).search(&set, "matrix").await;

        assert_eq!(items.len(), 1);
        assert_eq!(mock.call_count("b"), 0);
        assert_eq!(mock.calls()[0].1, ProviderQuery::Search {
            keyword: "matrix".to_string()
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_contribution_reports_timeout() {
        let mock = Arc::new(MockUpstream::new().with("b", MockReply::hang()));
        let provider = Provider::new("b", "Beta", "https://b.test");

        let contribution = SearchAggregator::new(mock, Duration::from_millis(250))
            .search_provider(&provider, "x")
            .await;

        assert!(matches!(
            contribution,
            Contribution::Nothing(UpstreamError::Timeout { elapsed_ms: 250 })
        ));
    }
}

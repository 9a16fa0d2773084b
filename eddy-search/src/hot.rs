//! Hot-list aggregation.
//!
//! Tries a fixed preference list of providers one after another and returns
//! the first non-empty recent-items list. Unlike search this path is
//! sequential: the first candidate with items wins and later candidates are
//! never contacted.

use std::sync::Arc;
use std::time::Duration;

use eddy_core::config::UpstreamConfig;
use eddy_core::{Provider, ProviderSet};
use tracing::{debug, info};

use crate::errors::UpstreamError;
use crate::providers::{UpstreamClient, bounded};
use crate::query::ProviderQuery;
use crate::types::{ContentItem, extract_list};

/// Sequential, short-circuiting hot-list aggregator.
#[derive(Debug, Clone)]
pub struct HotListAggregator {
    client: Arc<dyn UpstreamClient>,
    priority: Vec<String>,
    timeout: Duration,
    limit: usize,
    recent_hours: u32,
}

impl HotListAggregator {
    /// Creates an aggregator from the upstream configuration.
    pub fn new(client: Arc<dyn UpstreamClient>, config: &UpstreamConfig) -> Self {
        Self {
            client,
            priority: config.hot_priority.clone(),
            timeout: config.hot_timeout,
            limit: config.hot_list_limit,
            recent_hours: config.hot_recent_hours,
        }
    }

    /// Returns at most `limit` recent items from the first candidate that
    /// has any.
    ///
    /// Candidates are the active providers whose key is on the priority
    /// list, in registry order. Returns an empty list when every candidate
    /// fails or has nothing.
    pub async fn hot_list(&self, providers: &ProviderSet) -> Vec<ContentItem> {
        for provider in providers.active_with_keys(&self.priority) {
            match self.recent_items(provider).await {
                Ok(items) if !items.is_empty() => {
                    let items = take_prefix(items, self.limit);
                    info!(provider = %provider.key, items = items.len(), "Hot list served");
                    return items;
                }
                Ok(_) => debug!(provider = %provider.key, "Hot list candidate returned no items"),
                Err(e) => debug!(provider = %provider.key, "Hot list candidate failed: {e}"),
            }
        }

        info!("Hot list empty: no candidate provider returned items");
        Vec::new()
    }

    async fn recent_items(&self, provider: &Provider) -> Result<Vec<ContentItem>, UpstreamError> {
        let query = ProviderQuery::Recent {
            hours: self.recent_hours,
        };
        let payload = bounded(self.timeout, self.client.fetch_json(provider, &query)).await?;

        let list = extract_list(&payload).ok_or_else(|| UpstreamError::Parse {
            reason: "payload has no list or data array".to_string(),
        })?;

        Ok(list
            .into_iter()
            .map(|fields| ContentItem::from_provider(fields, provider))
            .collect())
    }
}

/// Keeps the first `limit` items, preserving provider order.
fn take_prefix(mut items: Vec<ContentItem>, limit: usize) -> Vec<ContentItem> {
    items.truncate(limit);
    items
}

//! Mock upstream client for testing.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use eddy_core::Provider;
#[cfg(test)]
use parking_lot::Mutex;

#[cfg(test)]
use super::UpstreamClient;
#[cfg(test)]
use crate::errors::UpstreamError;
#[cfg(test)]
use crate::query::ProviderQuery;

/// Scripted response for one provider.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockReply {
    /// Time spent before replying
    pub delay: Duration,
    /// What the call returns
    pub result: Result<serde_json::Value, UpstreamError>,
}

#[cfg(test)]
impl MockReply {
    /// Replies immediately with `payload`.
    pub fn json(payload: serde_json::Value) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(payload),
        }
    }

    /// Replies with `{ "list": [...] }` holding `count` numbered items.
    pub fn items(count: usize) -> Self {
        let list: Vec<serde_json::Value> = (0..count)
            .map(|i| serde_json::json!({ "vod_id": i, "vod_name": format!("item-{i}") }))
            .collect();
        Self::json(serde_json::json!({ "code": 1, "list": list }))
    }

    /// Fails immediately with `error`.
    pub fn error(error: UpstreamError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    /// Never answers within any reasonable timeout.
    pub fn hang() -> Self {
        Self::items(1).after(Duration::from_secs(3600))
    }

    /// Delays the reply by `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Mock upstream keyed by provider key, recording every call it receives.
///
/// Providers without a scripted reply fail with a network error.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockUpstream {
    replies: HashMap<String, MockReply>,
    calls: Mutex<Vec<(String, ProviderQuery)>>,
}

#[cfg(test)]
impl MockUpstream {
    /// Creates a mock with no scripted providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for `key`.
    pub fn with(mut self, key: &str, reply: MockReply) -> Self {
        self.replies.insert(key.to_string(), reply);
        self
    }

    /// Number of calls made to `key`.
    pub fn call_count(&self, key: &str) -> usize {
        self.calls.lock().iter().filter(|(k, _)| k == key).count()
    }

    /// Total number of calls received.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<(String, ProviderQuery)> {
        self.calls.lock().clone()
    }

    async fn reply(
        &self,
        provider: &Provider,
        query: &ProviderQuery,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.calls
            .lock()
            .push((provider.key.clone(), query.clone()));

        let Some(reply) = self.replies.get(&provider.key).cloned() else {
            return Err(UpstreamError::Network {
                reason: format!("no mock reply for {}", provider.key),
            });
        };
        tokio::time::sleep(reply.delay).await;
        reply.result
    }
}

#[cfg(test)]
#[async_trait]
impl UpstreamClient for MockUpstream {
    async fn fetch_json(
        &self,
        provider: &Provider,
        query: &ProviderQuery,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.reply(provider, query).await
    }

    async fn fetch_complete(
        &self,
        provider: &Provider,
        query: &ProviderQuery,
    ) -> Result<(), UpstreamError> {
        self.reply(provider, query).await.map(|_| ())
    }
}

//! reqwest-backed upstream client for production use.

use std::time::Duration;

use async_trait::async_trait;
use eddy_core::Provider;
use eddy_core::config::UpstreamConfig;
use tracing::trace;

use super::UpstreamClient;
use crate::errors::UpstreamError;
use crate::query::ProviderQuery;

/// HTTP client speaking the shared provider query convention.
///
/// One `reqwest::Client` (and its connection pool) is shared by every
/// aggregation operation, so many upstream calls can be outstanding at once.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
}

impl HttpUpstreamClient {
    /// Creates a client using the configured user agent.
    ///
    /// The client-level timeout is a backstop only; each operation applies
    /// its own, shorter bound.
    ///
    /// # Errors
    /// - `UpstreamError::Network` - TLS backend or client could not be initialised
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let backstop = [
            config.probe_timeout,
            config.hot_timeout,
            config.search_timeout,
            config.detail_timeout,
        ]
        .into_iter()
        .max()
        .unwrap_or(Duration::from_secs(10))
            + Duration::from_secs(1);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(backstop)
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .map_err(|e| UpstreamError::Network {
                reason: format!("HTTP client creation failed: {e}"),
            })?;

        Ok(Self { client })
    }

    /// Builds the request URL, keeping any query already on the endpoint.
    ///
    /// # Errors
    /// - `UpstreamError::InvalidEndpoint` - Endpoint is not an absolute URL
    pub fn build_url(provider: &Provider, query: &ProviderQuery) -> Result<reqwest::Url, UpstreamError> {
        let mut url = provider
            .endpoint_url()
            .map_err(|e| UpstreamError::InvalidEndpoint {
                endpoint: provider.endpoint.clone(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().extend_pairs(query.params());
        Ok(url)
    }

    async fn send(
        &self,
        provider: &Provider,
        query: &ProviderQuery,
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = Self::build_url(provider, query)?;
        trace!(provider = %provider.key, action = query.action(), %url, "Upstream request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Network {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(UpstreamError::HttpStatus {
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn fetch_json(
        &self,
        provider: &Provider,
        query: &ProviderQuery,
    ) -> Result<serde_json::Value, UpstreamError> {
        let response = self.send(provider, query).await?;
        let body = response.bytes().await.map_err(|e| UpstreamError::Network {
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Parse {
            reason: e.to_string(),
        })
    }

    async fn fetch_complete(
        &self,
        provider: &Provider,
        query: &ProviderQuery,
    ) -> Result<(), UpstreamError> {
        let response = self.send(provider, query).await?;
        response.bytes().await.map_err(|e| UpstreamError::Network {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_keyword() {
        let provider = Provider::new("ffzy", "Feifan", "https://ffzy.test/api.php/provide/vod");
        let url = HttpUpstreamClient::build_url(
            &provider,
            &ProviderQuery::Search {
                keyword: "流浪 地球&x=1".to_string(),
            },
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("ac".to_string(), "list".to_string()),
                ("wd".to_string(), "流浪 地球&x=1".to_string()),
                ("out".to_string(), "json".to_string()),
            ]
        );
        assert_eq!(url.path(), "/api.php/provide/vod");
    }

    #[test]
    fn test_build_url_keeps_existing_query() {
        let provider = Provider::new("x", "X", "https://x.test/api?token=abc");
        let url = HttpUpstreamClient::build_url(&provider, &ProviderQuery::Probe).unwrap();
        assert_eq!(url.query(), Some("token=abc&ac=list&pg=1"));
    }

    #[test]
    fn test_build_url_rejects_relative_endpoint() {
        let provider = Provider::new("bad", "Bad", "not a url");
        let result = HttpUpstreamClient::build_url(&provider, &ProviderQuery::Probe);
        assert!(matches!(result, Err(UpstreamError::InvalidEndpoint { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let client = HttpUpstreamClient::new(&UpstreamConfig::default()).unwrap();
        let provider = Provider::new("dead", "Dead", "http://127.0.0.1:9/api");
        let result = client.fetch_complete(&provider, &ProviderQuery::Probe).await;
        assert!(matches!(result, Err(UpstreamError::Network { .. })));
    }
}

//! Data types for aggregated results.

use eddy_core::Provider;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Latency reported when a provider is unknown, unreachable or not yet
/// measured.
pub const SENTINEL_LATENCY_MS: u64 = 9999;

/// Provider-supplied item tagged with the provider it came from.
///
/// The provider's own fields are kept verbatim and flattened into the JSON
/// object next to the injected provenance fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Provider's own fields, untouched
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Key of the provider the item came from
    pub origin_provider_key: String,
    /// Display name of the provider the item came from
    pub origin_provider_name: String,
    /// Round-trip latency of the origin provider, filled in only by a probe
    pub latency: u64,
}

impl ContentItem {
    const INJECTED: [&'static str; 3] = ["originProviderKey", "originProviderName", "latency"];

    /// Tags a raw provider record with its origin.
    ///
    /// Provider fields that collide with the injected names are dropped so
    /// the serialized object never carries duplicate keys.
    pub fn from_provider(mut fields: Map<String, Value>, provider: &Provider) -> Self {
        for name in Self::INJECTED {
            fields.remove(name);
        }
        Self {
            fields,
            origin_provider_key: provider.key.clone(),
            origin_provider_name: provider.name.clone(),
            latency: SENTINEL_LATENCY_MS,
        }
    }

    /// Looks up one of the provider's own fields.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Outcome of a latency probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyResult {
    /// Provider that was probed
    pub provider_key: String,
    /// Round-trip time, or [`SENTINEL_LATENCY_MS`]
    pub latency_ms: u64,
}

impl LatencyResult {
    /// Result for a provider that could not be measured.
    pub fn unreachable(provider_key: impl Into<String>) -> Self {
        Self {
            provider_key: provider_key.into(),
            latency_ms: SENTINEL_LATENCY_MS,
        }
    }

    /// Returns true unless the latency is the sentinel.
    pub fn is_reachable(&self) -> bool {
        self.latency_ms != SENTINEL_LATENCY_MS
    }
}

/// Pulls the item array out of a provider payload.
///
/// Providers put their items under `list` or, failing that, `data`. Returns
/// `None` when neither field holds an array. Non-object entries are skipped.
pub fn extract_list(payload: &Value) -> Option<Vec<Map<String, Value>>> {
    let list = ["list", "data"]
        .iter()
        .filter_map(|field| payload.get(field))
        .find(|value| !value.is_null())?;

    let entries = list.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(|entry| entry.as_object().cloned())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn provider() -> Provider {
        Provider::new("ffzy", "Feifan", "https://ffzy.test/api")
    }

    #[test]
    fn test_extract_prefers_list_over_data() {
        let payload = json!({"list": [{"vod_id": 1}], "data": [{"vod_id": 2}, {"vod_id": 3}]});
        let items = extract_list(&payload).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["vod_id"], 1);
    }

    #[test]
    fn test_extract_falls_back_to_data() {
        let payload = json!({"code": 1, "list": null, "data": [{"vod_id": 7}]});
        assert_eq!(extract_list(&payload).unwrap()[0]["vod_id"], 7);
    }

    #[test]
    fn test_extract_empty_list_is_not_a_fallback() {
        let payload = json!({"list": [], "data": [{"vod_id": 1}]});
        assert!(extract_list(&payload).unwrap().is_empty());
    }

    #[test]
    fn test_extract_rejects_non_array_payloads() {
        assert!(extract_list(&json!({"list": "nope"})).is_none());
        assert!(extract_list(&json!({"msg": "error"})).is_none());
        assert!(extract_list(&json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_extract_skips_non_object_entries() {
        let payload = json!({"list": [{"vod_id": 1}, 42, "x", {"vod_id": 2}]});
        assert_eq!(extract_list(&payload).unwrap().len(), 2);
    }

    #[test]
    fn test_content_item_serializes_flat_with_provenance() {
        let mut fields = Map::new();
        fields.insert("vod_name".to_string(), json!("Example"));
        fields.insert("originProviderKey".to_string(), json!("spoofed"));

        let item = ContentItem::from_provider(fields, &provider());
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["vod_name"], "Example");
        assert_eq!(value["originProviderKey"], "ffzy");
        assert_eq!(value["originProviderName"], "Feifan");
        assert_eq!(value["latency"], SENTINEL_LATENCY_MS);
    }

    #[test]
    fn test_latency_result_wire_shape() {
        let result = LatencyResult::unreachable("lzi");
        assert!(!result.is_reachable());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"providerKey": "lzi", "latencyMs": 9999})
        );
    }
}

//! Provider data model.
//!
//! A provider is a third-party content source reachable over HTTP and
//! identified by a stable key. Providers travel through the system as an
//! immutable [`ProviderSet`] snapshot so that a request never observes a
//! half-replaced registry.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::registry::RegistryError;

/// Single upstream content provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique, stable identifier (e.g. "ffzy")
    pub key: String,
    /// Human-readable display label
    pub name: String,
    /// Base query endpoint, persisted as `api`
    #[serde(rename = "api")]
    pub endpoint: String,
    /// Whether the provider takes part in search and hot-list aggregation
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Provider {
    /// Creates an active provider.
    pub fn new(key: impl Into<String>, name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            endpoint: endpoint.into(),
            active: true,
        }
    }

    /// Returns a copy of this provider with the given active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Parses the endpoint into a URL.
    ///
    /// # Errors
    /// - `url::ParseError` - Endpoint is not an absolute URL
    pub fn endpoint_url(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&self.endpoint)
    }
}

/// Ordered, immutable snapshot of providers with unique keys.
///
/// Cloning is cheap: all clones share the same backing storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Provider>", into = "Vec<Provider>")]
pub struct ProviderSet {
    providers: Arc<[Provider]>,
}

impl ProviderSet {
    /// Builds a provider set, rejecting duplicate keys.
    ///
    /// # Errors
    /// - `RegistryError::DuplicateKey` - Two providers share the same key
    pub fn new(providers: Vec<Provider>) -> Result<Self, RegistryError> {
        if let Some(key) = first_duplicate_key(&providers) {
            return Err(RegistryError::DuplicateKey { key });
        }
        Ok(Self {
            providers: providers.into(),
        })
    }

    /// Builds a provider set, keeping only the first provider for each key.
    ///
    /// Used when loading stores written by older tools that never enforced
    /// uniqueness.
    pub fn dedup_first(providers: Vec<Provider>) -> Self {
        let mut seen = HashSet::new();
        let unique: Vec<Provider> = providers
            .into_iter()
            .filter(|p| seen.insert(p.key.clone()))
            .collect();
        Self {
            providers: unique.into(),
        }
    }

    /// Looks up a provider by key, regardless of its active flag.
    pub fn get(&self, key: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.key == key)
    }

    /// Iterates over all providers in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.iter()
    }

    /// Iterates over active providers in registry order.
    pub fn active(&self) -> impl Iterator<Item = &Provider> {
        self.providers.iter().filter(|p| p.active)
    }

    /// Active providers whose key is in `keys`, in registry order.
    pub fn active_with_keys<'a>(&'a self, keys: &'a [String]) -> impl Iterator<Item = &'a Provider> {
        self.active().filter(move |p| keys.iter().any(|k| k == &p.key))
    }

    /// Returns the number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if the set holds no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Copies the providers out into an owned vector.
    pub fn to_vec(&self) -> Vec<Provider> {
        self.providers.to_vec()
    }
}

impl TryFrom<Vec<Provider>> for ProviderSet {
    type Error = RegistryError;

    fn try_from(providers: Vec<Provider>) -> Result<Self, Self::Error> {
        Self::new(providers)
    }
}

impl From<ProviderSet> for Vec<Provider> {
    fn from(set: ProviderSet) -> Self {
        set.to_vec()
    }
}

fn first_duplicate_key(providers: &[Provider]) -> Option<String> {
    let mut seen = HashSet::new();
    providers
        .iter()
        .find(|p| !seen.insert(p.key.as_str()))
        .map(|p| p.key.clone())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample() -> ProviderSet {
        ProviderSet::new(vec![
            Provider::new("ffzy", "Feifan", "https://ffzy.test/api"),
            Provider::new("bfzy", "Baofeng", "https://bfzy.test/api").with_active(false),
            Provider::new("lzi", "Liangzi", "https://lzi.test/api"),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = ProviderSet::new(vec![
            Provider::new("ffzy", "A", "https://a.test"),
            Provider::new("ffzy", "B", "https://b.test"),
        ]);
        assert!(matches!(result, Err(RegistryError::DuplicateKey { key }) if key == "ffzy"));
    }

    #[test]
    fn test_inactive_provider_still_addressable() {
        let set = sample();
        assert_eq!(set.get("bfzy").map(|p| p.name.as_str()), Some("Baofeng"));
        let active: Vec<&str> = set.active().map(|p| p.key.as_str()).collect();
        assert_eq!(active, vec!["ffzy", "lzi"]);
    }

    #[test]
    fn test_active_with_keys_keeps_registry_order() {
        let set = sample();
        let keys = vec!["lzi".to_string(), "bfzy".to_string(), "ffzy".to_string()];
        let picked: Vec<&str> = set.active_with_keys(&keys).map(|p| p.key.as_str()).collect();
        assert_eq!(picked, vec!["ffzy", "lzi"]);
    }

    #[test]
    fn test_serde_uses_persisted_field_names() {
        let json = r#"[{"key":"ffzy","name":"Feifan","api":"https://ffzy.test/api"}]"#;
        let set: ProviderSet = serde_json::from_str(json).unwrap();
        let provider = set.get("ffzy").unwrap();
        assert_eq!(provider.endpoint, "https://ffzy.test/api");
        assert!(provider.active);

        let back = serde_json::to_value(&set).unwrap();
        assert_eq!(back[0]["api"], "https://ffzy.test/api");
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[{"key":"a","name":"A","api":"x"},{"key":"a","name":"B","api":"y"}]"#;
        assert!(serde_json::from_str::<ProviderSet>(json).is_err());
    }

    #[test]
    fn test_dedup_first_keeps_earliest() {
        let set = ProviderSet::dedup_first(vec![
            Provider::new("a", "first", "x"),
            Provider::new("b", "other", "y"),
            Provider::new("a", "second", "z"),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a").unwrap().name, "first");
    }

    proptest! {
        #[test]
        fn prop_new_accepts_iff_keys_unique(keys in proptest::collection::vec("[a-d]", 0..6)) {
            let providers: Vec<Provider> = keys
                .iter()
                .map(|k| Provider::new(k.clone(), k.clone(), "https://p.test"))
                .collect();
            let unique: HashSet<&String> = keys.iter().collect();
            prop_assert_eq!(ProviderSet::new(providers).is_ok(), unique.len() == keys.len());
        }
    }
}

//! Built-in provider seed written on first start.

use crate::provider::{Provider, ProviderSet};

/// Providers written to a fresh store and optionally merged into an
/// existing one.
///
/// Endpoints are placeholders; real deployments replace them through the
/// admin API or `eddy sites import`.
pub fn default_providers() -> ProviderSet {
    ProviderSet::dedup_first(vec![
        Provider::new("ffzy", "非凡影视", "https://ffzy.invalid/api.php/provide/vod"),
        Provider::new("bfzy", "暴风资源", "https://bfzy.invalid/api.php/provide/vod"),
        Provider::new("lzi", "量子资源", "https://lzi.invalid/api.php/provide/vod"),
        Provider::new("dbzy", "豆瓣资源", "https://dbzy.invalid/api.php/provide/vod"),
    ])
}

/// Appends every default provider whose key is missing from `stored`.
///
/// Stored providers always win; nothing already present is overwritten.
pub fn merge_missing_defaults(stored: ProviderSet) -> ProviderSet {
    let mut merged = stored.to_vec();
    for provider in default_providers().iter() {
        if stored.get(&provider.key).is_none() {
            merged.push(provider.clone());
        }
    }
    ProviderSet::dedup_first(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_hot_priority_keys() {
        let defaults = default_providers();
        for key in ["ffzy", "bfzy", "lzi", "dbzy"] {
            assert!(defaults.get(key).is_some(), "missing default {key}");
        }
    }

    #[test]
    fn test_merge_keeps_stored_entries() {
        let stored = ProviderSet::new(vec![
            Provider::new("ffzy", "Custom", "https://mirror.test/api").with_active(false),
            Provider::new("extra", "Extra", "https://extra.test/api"),
        ])
        .unwrap();

        let merged = merge_missing_defaults(stored);

        let ffzy = merged.get("ffzy").unwrap();
        assert_eq!(ffzy.name, "Custom");
        assert!(!ffzy.active);
        assert!(merged.get("extra").is_some());
        assert!(merged.get("dbzy").is_some());
        assert_eq!(merged.len(), 5);
        assert_eq!(merged.iter().next().unwrap().key, "ffzy");
    }
}

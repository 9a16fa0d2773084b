//! In-memory registry for tests and ephemeral deployments.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{ProviderRegistry, RegistryError};
use crate::provider::ProviderSet;

/// Registry that keeps the provider set in process memory only.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    snapshot: RwLock<ProviderSet>,
}

impl InMemoryRegistry {
    /// Creates a registry seeded with the given providers.
    pub fn new(providers: ProviderSet) -> Self {
        Self {
            snapshot: RwLock::new(providers),
        }
    }
}

#[async_trait]
impl ProviderRegistry for InMemoryRegistry {
    async fn list(&self) -> ProviderSet {
        self.snapshot.read().clone()
    }

    async fn replace_all(&self, providers: ProviderSet) -> Result<(), RegistryError> {
        *self.snapshot.write() = providers;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    #[tokio::test]
    async fn test_replace_all_visible_to_list() {
        let registry = InMemoryRegistry::default();
        assert!(registry.list().await.is_empty());

        let set = ProviderSet::new(vec![Provider::new("ffzy", "Feifan", "https://ffzy.test")])
            .unwrap();
        registry.replace_all(set.clone()).await.unwrap();
        assert_eq!(registry.list().await, set);
    }

    #[tokio::test]
    async fn test_snapshot_unaffected_by_later_replace() {
        let first = ProviderSet::new(vec![Provider::new("a", "A", "https://a.test")]).unwrap();
        let registry = InMemoryRegistry::new(first.clone());

        let snapshot = registry.list().await;
        registry.replace_all(ProviderSet::default()).await.unwrap();

        assert_eq!(snapshot, first);
        assert!(registry.list().await.is_empty());
    }
}

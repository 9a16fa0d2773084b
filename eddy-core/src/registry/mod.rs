//! Provider registry implementations.
//!
//! The registry is the only shared state in Eddy. Aggregation code takes a
//! [`ProviderSet`] snapshot at request start and never touches the registry
//! again for the rest of that request.

use async_trait::async_trait;
use thiserror::Error;

use crate::provider::ProviderSet;

pub mod defaults;
pub mod file;
pub mod memory;

pub use defaults::default_providers;
pub use file::FileRegistry;
pub use memory::InMemoryRegistry;

/// Errors that can occur while loading or replacing the provider set.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two providers in one set share a key.
    #[error("Duplicate provider key: {key}")]
    DuplicateKey {
        /// The key that appears more than once
        key: String,
    },

    /// Reading or writing the backing store failed.
    #[error("Registry I/O failed for {path}: {reason}")]
    Io {
        /// Store location
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// The backing store holds data that cannot be encoded or decoded.
    #[error("Registry serialization failed: {reason}")]
    Serialization {
        /// Underlying failure
        reason: String,
    },
}

/// Source of truth for the set of known providers.
///
/// Implementations must guarantee that `replace_all` is atomic from the
/// point of view of `list`: callers see either the previous set or the new
/// one, never a mix.
#[async_trait]
pub trait ProviderRegistry: Send + Sync + std::fmt::Debug {
    /// Returns a snapshot of the latest successfully stored provider set.
    async fn list(&self) -> ProviderSet;

    /// Replaces the whole provider set.
    ///
    /// # Errors
    /// - `RegistryError::Io` - Backing store could not be written
    /// - `RegistryError::Serialization` - Provider set could not be encoded
    async fn replace_all(&self, providers: ProviderSet) -> Result<(), RegistryError>;
}

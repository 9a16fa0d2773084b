//! Eddy Core - Provider registry and shared plumbing
//!
//! This crate provides the building blocks every other Eddy crate relies on:
//! the provider data model, the swappable provider registry, configuration
//! management and tracing setup.

pub mod config;
pub mod provider;
pub mod registry;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::EddyConfig;
pub use provider::{Provider, ProviderSet};
pub use registry::{FileRegistry, InMemoryRegistry, ProviderRegistry, RegistryError};

/// Core errors that can bubble up from any Eddy subsystem.
///
/// High-level error types representing failures in core functionality.
#[derive(Debug, thiserror::Error)]
pub enum EddyError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {reason}")]
    Server { reason: String },
}

impl EddyError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            EddyError::Registry(e) => match e {
                RegistryError::DuplicateKey { key } => {
                    format!("Provider key '{key}' appears more than once")
                }
                _ => "Provider registry error occurred".to_string(),
            },
            EddyError::Configuration { reason } => format!("Configuration error: {reason}"),
            EddyError::Io(_) => "File system error occurred".to_string(),
            EddyError::Server { reason } => format!("Server error: {reason}"),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EddyError::Configuration { .. }
                | EddyError::Registry(RegistryError::DuplicateKey { .. })
        )
    }

    /// Wraps any displayable server failure.
    pub fn from_server_error(error: impl std::fmt::Display) -> Self {
        EddyError::Server {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EddyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        let duplicate = EddyError::Registry(RegistryError::DuplicateKey {
            key: "ffzy".to_string(),
        });
        assert!(duplicate.is_user_error());
        assert!(duplicate.user_message().contains("ffzy"));

        let io = EddyError::Io(std::io::Error::other("disk full"));
        assert!(!io.is_user_error());
        assert_eq!(io.user_message(), "File system error occurred");
    }
}

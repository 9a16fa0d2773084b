//! Centralized configuration for Eddy.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Central configuration for all Eddy components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct EddyConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub registry: RegistryConfig,
    pub admin: AdminConfig,
}

/// HTTP listener and static asset configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Directory served for non-API paths
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Upstream provider query configuration.
///
/// Controls per-call timeouts for each aggregation operation and the
/// fixed preference list used by the hot list.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Timeout for a single latency probe
    pub probe_timeout: Duration,
    /// Timeout for each hot-list provider attempt
    pub hot_timeout: Duration,
    /// Timeout for each provider during search fan-out
    pub search_timeout: Duration,
    /// Timeout for a detail lookup
    pub detail_timeout: Duration,
    /// Maximum number of hot-list items returned
    pub hot_list_limit: usize,
    /// Provider keys tried for the hot list, in preference order
    pub hot_priority: Vec<String>,
    /// Recency window requested from providers for the hot list, in hours
    pub hot_recent_hours: u32,
    /// User agent for upstream requests
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(3000),
            hot_timeout: Duration::from_millis(3000),
            search_timeout: Duration::from_millis(6000),
            detail_timeout: Duration::from_millis(6000),
            hot_list_limit: 12,
            hot_priority: ["ffzy", "bfzy", "lzi", "dbzy"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            hot_recent_hours: 24,
            user_agent: concat!("eddy/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Provider registry storage configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// JSON file holding the provider set
    pub data_file: PathBuf,
    /// Append built-in providers missing from the stored set on startup
    pub merge_defaults: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("db.json"),
            merge_defaults: false,
        }
    }
}

/// Administrative access configuration.
///
/// There is no built-in credential: with no password configured every
/// administrative login and write is rejected.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub password: Option<String>,
}

impl AdminConfig {
    /// Checks a candidate password against the configured one.
    pub fn verify(&self, candidate: &str) -> bool {
        match &self.password {
            Some(password) => !password.is_empty() && password == candidate,
            None => false,
        }
    }
}

impl EddyConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("EDDY_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("EDDY_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        if let Ok(dir) = std::env::var("EDDY_STATIC_DIR") {
            config.server.static_dir = PathBuf::from(dir);
        }

        if let Ok(file) = std::env::var("EDDY_DATA_FILE") {
            config.registry.data_file = PathBuf::from(file);
        }

        if let Ok(merge) = std::env::var("EDDY_MERGE_DEFAULTS") {
            match parse_flag(&merge) {
                Some(flag) => config.registry.merge_defaults = flag,
                None => warn!(value = %merge, "Ignoring unrecognised EDDY_MERGE_DEFAULTS"),
            }
        }

        if let Ok(password) = std::env::var("EDDY_ADMIN_PASSWORD") {
            if !password.is_empty() {
                config.admin.password = Some(password);
            }
        }

        if let Ok(timeout) = std::env::var("EDDY_SEARCH_TIMEOUT_MS") {
            if let Ok(millis) = timeout.parse::<u64>() {
                config.upstream.search_timeout = Duration::from_millis(millis);
            }
        }

        if let Ok(timeout) = std::env::var("EDDY_PROBE_TIMEOUT_MS") {
            if let Ok(millis) = timeout.parse::<u64>() {
                config.upstream.probe_timeout = Duration::from_millis(millis);
            }
        }

        config
    }

    /// Creates a configuration with short timeouts for tests.
    pub fn for_testing() -> Self {
        Self {
            upstream: UpstreamConfig {
                probe_timeout: Duration::from_millis(300),
                hot_timeout: Duration::from_millis(300),
                search_timeout: Duration::from_millis(600),
                detail_timeout: Duration::from_millis(600),
                ..Default::default()
            },
            admin: AdminConfig {
                password: Some("test-password".to_string()),
            },
            ..Default::default()
        }
    }
}

/// Parses a boolean environment flag: `true`/`1`/`yes`/`on` and
/// `false`/`0`/`no`/`off`, case-insensitive.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = EddyConfig::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.probe_timeout, Duration::from_millis(3000));
        assert_eq!(config.upstream.hot_timeout, Duration::from_millis(3000));
        assert_eq!(config.upstream.search_timeout, Duration::from_millis(6000));
        assert_eq!(config.upstream.detail_timeout, Duration::from_millis(6000));
        assert_eq!(config.upstream.hot_list_limit, 12);
        assert_eq!(config.upstream.hot_priority, vec!["ffzy", "bfzy", "lzi", "dbzy"]);
        assert_eq!(config.registry.data_file, PathBuf::from("db.json"));
        assert!(!config.registry.merge_defaults);
        assert!(config.admin.password.is_none());
    }

    #[test]
    fn test_admin_verify_without_password_rejects() {
        let admin = AdminConfig::default();
        assert!(!admin.verify(""));
        assert!(!admin.verify("admin"));

        let admin = AdminConfig {
            password: Some("s3cret".to_string()),
        };
        assert!(admin.verify("s3cret"));
        assert!(!admin.verify("admin"));
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("EDDY_PORT", "8081");
            std::env::set_var("EDDY_DATA_FILE", "/tmp/eddy-sites.json");
            std::env::set_var("EDDY_MERGE_DEFAULTS", "true");
            std::env::set_var("EDDY_ADMIN_PASSWORD", "hunter2");
            std::env::set_var("EDDY_SEARCH_TIMEOUT_MS", "1500");
        }

        let config = EddyConfig::from_env();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.registry.data_file, PathBuf::from("/tmp/eddy-sites.json"));
        assert!(config.registry.merge_defaults);
        assert_eq!(config.admin.password.as_deref(), Some("hunter2"));
        assert_eq!(config.upstream.search_timeout, Duration::from_millis(1500));

        // Cleanup
        unsafe {
            std::env::remove_var("EDDY_PORT");
            std::env::remove_var("EDDY_DATA_FILE");
            std::env::remove_var("EDDY_MERGE_DEFAULTS");
            std::env::remove_var("EDDY_ADMIN_PASSWORD");
            std::env::remove_var("EDDY_SEARCH_TIMEOUT_MS");
        }
    }

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        for value in ["true", "TRUE", "1", "yes", " on "] {
            assert_eq!(parse_flag(value), Some(true), "{value}");
        }
        for value in ["false", "0", "No", "off", ""] {
            assert_eq!(parse_flag(value), Some(false), "{value}");
        }
        assert_eq!(parse_flag("maybe"), None);
    }
}

//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};
use eddy_core::{EddyConfig, FileRegistry, Provider, ProviderRegistry, ProviderSet};
use eddy_search::AggregationService;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// Provider store file
        #[arg(long)]
        data_file: Option<PathBuf>,
        /// Directory served for non-API paths
        #[arg(long)]
        static_dir: Option<PathBuf>,
        /// Add missing built-in providers to an existing store
        #[arg(long)]
        merge_defaults: bool,
    },
    /// Measure the latency of one provider
    Check {
        /// Provider key
        key: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Show the current hot list
    Hot {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Search all active providers
    Search {
        /// Search keyword
        wd: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Fetch the raw detail payload for one item
    Detail {
        /// Provider key
        site_key: String,
        /// Provider-specific item id
        id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Manage the stored provider list
    Sites {
        #[command(subcommand)]
        command: SitesCommand,
        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Provider list management commands
#[derive(Subcommand)]
pub enum SitesCommand {
    /// Print the stored providers
    List,
    /// Replace the stored providers with the contents of a JSON file
    Import {
        /// File holding either a provider array or `{ "sites": [...] }`
        file: PathBuf,
    },
}

/// Location of the provider store
#[derive(Args)]
pub struct StoreArgs {
    /// Provider store file
    #[arg(long)]
    data_file: Option<PathBuf>,
}

/// Handle the CLI command
///
/// # Errors
/// Returns the failure of whichever command was run
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Server {
            host,
            port,
            data_file,
            static_dir,
            merge_defaults,
        } => {
            let mut config = EddyConfig::from_env();
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(static_dir) = static_dir {
                config.server.static_dir = static_dir;
            }
            if let Some(data_file) = data_file {
                config.registry.data_file = data_file;
            }
            config.registry.merge_defaults |= merge_defaults;

            eddy_web::run_server(config).await?;
            Ok(())
        }
        Commands::Check { key, store } => {
            let service = open_service(&store).await?;
            print_json(&service.check(&key).await)
        }
        Commands::Hot { store } => {
            let service = open_service(&store).await?;
            print_json(&service.hot().await)
        }
        Commands::Search { wd, store } => {
            let service = open_service(&store).await?;
            print_json(&service.search(&wd).await)
        }
        Commands::Detail {
            site_key,
            id,
            store,
        } => {
            let service = open_service(&store).await?;
            print_json(&service.detail(&site_key, &id).await?)
        }
        Commands::Sites { command, store } => {
            let registry = open_registry(&store).await?;
            match command {
                SitesCommand::List => print_json(&registry.list().await.to_vec()),
                SitesCommand::Import { file } => import_sites(&registry, &file).await,
            }
        }
    }
}

async fn open_registry(store: &StoreArgs) -> anyhow::Result<FileRegistry> {
    let config = EddyConfig::from_env();
    let path = store
        .data_file
        .clone()
        .unwrap_or(config.registry.data_file);

    FileRegistry::open(path.clone(), config.registry.merge_defaults)
        .await
        .with_context(|| format!("failed to open provider store {}", path.display()))
}

async fn open_service(store: &StoreArgs) -> anyhow::Result<AggregationService> {
    let config = EddyConfig::from_env();
    let registry = open_registry(store).await?;
    let service = AggregationService::with_http(&config.upstream, Arc::new(registry))?;
    Ok(service)
}

async fn import_sites(registry: &FileRegistry, file: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let providers = parse_sites(&raw)?;
    let count = providers.len();

    registry.replace_all(providers).await?;

    info!(providers = count, file = %file.display(), "Imported provider list");
    println!("Imported {count} providers");
    Ok(())
}

/// Parses a provider list given either as a bare array or wrapped in a
/// `sites` field.
fn parse_sites(raw: &str) -> anyhow::Result<ProviderSet> {
    let document: Value = serde_json::from_str(raw).context("provider file is not valid JSON")?;
    let sites = match document {
        Value::Object(mut wrapper) => wrapper
            .remove("sites")
            .context("provider file object has no `sites` field")?,
        other => other,
    };

    let providers: Vec<Provider> =
        serde_json::from_value(sites).context("provider file has an unexpected shape")?;
    Ok(ProviderSet::new(providers)?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let providers = parse_sites(
            r#"[{"key":"a","name":"A","api":"http://a.invalid/api"},
                {"key":"b","name":"B","api":"http://b.invalid/api","active":false}]"#,
        )
        .unwrap();

        assert_eq!(providers.len(), 2);
        assert!(providers.get("a").unwrap().active);
        assert!(!providers.get("b").unwrap().active);
    }

    #[test]
    fn test_parse_wrapped_document() {
        let providers = parse_sites(
            r#"{"sites":[{"key":"a","name":"A","api":"http://a.invalid/api"}],
                "updated_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(providers.len(), 1);
    }

    #[test]
    fn test_parse_rejects_duplicates_and_garbage() {
        let duplicate = parse_sites(
            r#"[{"key":"a","name":"A","api":"http://a.invalid/api"},
                {"key":"a","name":"A2","api":"http://a2.invalid/api"}]"#,
        );
        assert!(duplicate.is_err());

        assert!(parse_sites("not json").is_err());
        assert!(parse_sites(r#"{"providers":[]}"#).is_err());
    }

    #[tokio::test]
    async fn test_import_replaces_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("db.json");
        let import = dir.path().join("import.json");
        std::fs::write(
            &import,
            r#"[{"key":"only","name":"Only","api":"http://only.invalid/api"}]"#,
        )
        .unwrap();

        let registry = FileRegistry::open(store.clone(), false).await.unwrap();
        import_sites(&registry, &import).await.unwrap();

        let reopened = FileRegistry::open(store, false).await.unwrap();
        let keys: Vec<String> = reopened.list().await.iter().map(|p| p.key.clone()).collect();
        assert_eq!(keys, vec!["only"]);
    }
}

//! JSON-file backed registry.
//!
//! The whole provider set lives in one pretty-printed JSON document
//! (`{ "sites": [...], "updated_at": "..." }`). Reads are served from an
//! in-memory snapshot; writes go to a temporary sibling file which is then
//! renamed over the store, and the snapshot is only swapped after the rename
//! succeeds.
//!
//! The snapshot remembers the modification time and size of the file it was
//! loaded from. When another process rewrites the store (for example
//! `eddy sites import` next to a running server) the next `list` reloads it.
//! A rewritten file that no longer parses keeps the last good snapshot.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::defaults::{default_providers, merge_missing_defaults};
use super::{ProviderRegistry, RegistryError};
use crate::provider::{Provider, ProviderSet};

/// On-disk layout of the store.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryDocument {
    sites: Vec<Provider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// Identity of one version of the store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StoreStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl StoreStamp {
    async fn read(path: &Path) -> Option<Self> {
        let metadata = tokio::fs::metadata(path).await.ok()?;
        Some(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

#[derive(Debug)]
struct Loaded {
    providers: ProviderSet,
    stamp: Option<StoreStamp>,
}

/// Registry persisted to a single JSON file.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    merge_defaults: bool,
    loaded: RwLock<Loaded>,
    write_lock: Mutex<()>,
}

impl FileRegistry {
    /// Opens the store at `path`, seeding it with the default providers if
    /// the file does not exist yet.
    ///
    /// A store that exists but cannot be parsed is not fatal: the defaults
    /// are served in memory and the file is left untouched until the next
    /// successful `replace_all`. With `merge_defaults` set, default providers
    /// missing from the stored set are appended to the in-memory snapshot.
    ///
    /// # Errors
    /// - `RegistryError::Io` - Store is missing and could not be created
    /// - `RegistryError::Serialization` - Default set could not be encoded
    pub async fn open(path: impl Into<PathBuf>, merge_defaults: bool) -> Result<Self, RegistryError> {
        let path = path.into();

        let stored = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            match read_document(&path).await {
                Ok(set) => {
                    info!(path = %path.display(), providers = set.len(), "Loaded provider registry");
                    set
                }
                Err(e) => {
                    warn!(path = %path.display(), "Provider registry unreadable, serving defaults: {e}");
                    default_providers()
                }
            }
        } else {
            let defaults = default_providers();
            write_document(&path, &defaults).await?;
            info!(path = %path.display(), providers = defaults.len(), "Created provider registry with defaults");
            defaults
        };

        let stamp = StoreStamp::read(&path).await;
        let providers = with_defaults(stored, merge_defaults);

        Ok(Self {
            path,
            merge_defaults,
            loaded: RwLock::new(Loaded { providers, stamp }),
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reloads the store if the file on disk is not the one the snapshot
    /// came from.
    async fn refresh(&self) {
        let current = StoreStamp::read(&self.path).await;
        if current.is_none() || current == self.loaded.read().stamp {
            return;
        }

        let _guard = self.write_lock.lock().await;
        let current = StoreStamp::read(&self.path).await;
        if current.is_none() || current == self.loaded.read().stamp {
            return;
        }

        match read_document(&self.path).await {
            Ok(stored) => {
                let providers = with_defaults(stored, self.merge_defaults);
                info!(
                    path = %self.path.display(),
                    providers = providers.len(),
                    "Provider registry changed on disk, reloaded"
                );
                *self.loaded.write() = Loaded {
                    providers,
                    stamp: current,
                };
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "Provider registry changed on disk but is unreadable, keeping previous set: {e}"
                );
                // Remember the bad version so it is not re-parsed on every call.
                self.loaded.write().stamp = current;
            }
        }
    }
}

#[async_trait]
impl ProviderRegistry for FileRegistry {
    async fn list(&self) -> ProviderSet {
        self.refresh().await;
        self.loaded.read().providers.clone()
    }

    async fn replace_all(&self, providers: ProviderSet) -> Result<(), RegistryError> {
        // Serialize writers so the file and the snapshot always agree.
        let _guard = self.write_lock.lock().await;

        write_document(&self.path, &providers).await?;
        let count = providers.len();
        let stamp = StoreStamp::read(&self.path).await;
        *self.loaded.write() = Loaded { providers, stamp };

        info!(path = %self.path.display(), providers = count, "Provider registry replaced");
        Ok(())
    }
}

fn with_defaults(stored: ProviderSet, merge_defaults: bool) -> ProviderSet {
    if merge_defaults {
        merge_missing_defaults(stored)
    } else {
        stored
    }
}

async fn read_document(path: &Path) -> Result<ProviderSet, RegistryError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    let document: RegistryDocument =
        serde_json::from_slice(&bytes).map_err(|e| RegistryError::Serialization {
            reason: e.to_string(),
        })?;

    let total = document.sites.len();
    let set = ProviderSet::dedup_first(document.sites);
    if set.len() != total {
        warn!(
            path = %path.display(),
            dropped = total - set.len(),
            "Provider registry contained duplicate keys, keeping first occurrence"
        );
    }
    Ok(set)
}

async fn write_document(path: &Path, providers: &ProviderSet) -> Result<(), RegistryError> {
    let document = RegistryDocument {
        sites: providers.to_vec(),
        updated_at: Some(Utc::now()),
    };
    let json = serde_json::to_vec_pretty(&document).map_err(|e| RegistryError::Serialization {
        reason: e.to_string(),
    })?;

    let tmp_path = temp_path(path);
    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|e| io_error(&tmp_path, e))?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(io_error(path, e));
    }

    debug!(path = %path.display(), bytes = json.len(), "Provider registry written");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, error: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.display().to_string(),
        reason: error.to_string(),
    }
}

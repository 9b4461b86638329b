//! Backend selection.
//!
//! [`StoreConfig`] deserializes from the `[store]` table of the TOML
//! config file; [`open_store`] turns it into a ready-to-use
//! `Arc<dyn ComplaintStore>`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::json_file::JsonFileStore;
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;
use crate::store::ComplaintStore;

/// Which persistence medium backs the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Embedded SQLite database.
    #[default]
    Sqlite,
    /// Single JSON document rewritten on every mutation.
    Json,
    /// Process memory only.
    Memory,
}

impl StoreBackend {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
            Self::Memory => "memory",
        }
    }

    /// Where the backend keeps its data when no path is configured.
    pub fn default_path(&self) -> &'static Path {
        match self {
            Self::Sqlite => Path::new("data/complaints.db"),
            Self::Json => Path::new("data/complaints.json"),
            Self::Memory => Path::new(""),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "json" => Ok(Self::Json),
            "memory" => Ok(Self::Memory),
            other => Err(StoreError::Config(format!(
                "unknown store backend `{other}` (expected sqlite, json or memory)"
            ))),
        }
    }
}

/// Store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database or JSON file location; the backend default when unset.
    pub path: Option<PathBuf>,
    /// Bound on waiting for exclusive access, in milliseconds.
    pub lock_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            lock_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    /// The configured path, or the backend's default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| self.backend.default_path().to_path_buf())
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// Open the configured backend, creating parent directories as needed.
pub async fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn ComplaintStore>> {
    if config.lock_timeout_ms == 0 {
        return Err(StoreError::Config("lock_timeout_ms must be positive".into()));
    }

    let path = config.resolved_path();
    if config.backend != StoreBackend::Memory {
        ensure_parent_dir(&path)?;
    }
    info!(backend = %config.backend, path = %path.display(), "opening store");

    let store: Arc<dyn ComplaintStore> = match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(path, config.lock_timeout()).await?),
        StoreBackend::Json => {
            Arc::new(JsonFileStore::new(path).with_lock_timeout(config.lock_timeout()))
        }
        StoreBackend::Memory => {
            Arc::new(MemoryStore::new().with_lock_timeout(config.lock_timeout()))
        }
    };
    Ok(store)
}

fn ensure_parent_dir(path: &Path) -> StoreResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))
        }
        _ => Ok(()),
    }
}

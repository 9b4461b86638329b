//! Application configuration.
//!
//! Layers, lowest to highest precedence: built-in defaults, the TOML file,
//! then environment variables. The caller loads `.env` into the process
//! environment with [`load_dotenv`] before anything else reads it, so
//! `RUST_LOG` set there reaches the log filter. Command-line flags are
//! applied by the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use civicdesk_store::{StoreBackend, StoreConfig};
use civicdesk_web::{DEV_SESSION_SECRET, WebConfig};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config/civicdesk.toml";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// `[server]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

/// `[session]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Cookie signing key. The development secret is used when unset.
    pub secret: Option<String>,
    pub ttl_secs: i64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: 3600,
        }
    }
}

/// The whole config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub store: StoreConfig,
    pub session: SessionSection,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load the config file and apply environment overrides.
    ///
    /// An explicitly given file must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from environment variables read through `lookup`.
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("CIVICDESK_BACKEND") {
            self.store.backend = v.parse::<StoreBackend>()?;
        }
        if let Some(v) = var("DATABASE_PATH") {
            self.store.path = Some(PathBuf::from(v));
        }
        if let Some(v) = var("CIVICDESK_LOCK_TIMEOUT_MS") {
            self.store.lock_timeout_ms = parse_env("CIVICDESK_LOCK_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("CIVICDESK_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = var("CIVICDESK_PORT") {
            self.server.port = parse_env("CIVICDESK_PORT", &v)?;
        }
        if let Some(v) = var("SECRET_KEY") {
            self.session.secret = Some(v);
        }
        if let Some(v) = var("CIVICDESK_SESSION_TTL_SECS") {
            self.session.ttl_secs = parse_env("CIVICDESK_SESSION_TTL_SECS", &v)?;
        }
        Ok(())
    }

    /// Settings for the web server.
    pub fn web_config(&self) -> Result<WebConfig> {
        if self.session.ttl_secs <= 0 {
            bail!("session ttl_secs must be positive");
        }
        let session_secret = self
            .session
            .secret
            .clone()
            .unwrap_or_else(|| DEV_SESSION_SECRET.to_owned());
        Ok(WebConfig {
            bind_addr: self.server.bind.clone(),
            port: self.server.port,
            session_secret,
            session_ttl_secs: self.session.ttl_secs,
        })
    }
}

/// Load `.env` from the working directory into the process environment.
///
/// Returns the file's path, or `None` when there is no `.env`.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).context("failed to read .env file"),
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: `{value}`"))
}

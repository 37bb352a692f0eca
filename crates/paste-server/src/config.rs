use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use paste_core::ServiceConfig;
use paste_crypto::HashParams;

use crate::error::{ServerError, ServerResult};

/// Environment variables consulted by [`AppConfig::apply_env`].
pub mod env {
    pub const BIND_ADDR: &str = "PASTEBIN_BIND_ADDR";
    pub const DATABASE_URL: &str = "PASTEBIN_DATABASE_URL";
    pub const BLOB_ROOT: &str = "PASTEBIN_BLOB_ROOT";
    pub const CACHE_TTL_SECS: &str = "PASTEBIN_CACHE_TTL_SECS";
}

/// Complete process configuration, built once at startup and handed to
/// each component constructor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub blobs: BlobConfig,
    pub cache: CacheConfig,
    pub service: ServiceConfig,
    pub hashing: HashParams,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_body_bytes: 1024 * 1024,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            database_url: "sqlite:pastebin.db".into(),
            max_connections: 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    Fs,
    Memory,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    pub backend: BlobBackend,
    pub root: PathBuf,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::Fs,
            root: PathBuf::from("texts"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10_000,
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid with the TOML file at `path` if given, overlaid
    /// with the process environment.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> ServerResult<()> {
        self.service.validate().map_err(ServerError::Config)
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        if let Some(addr) = lookup(env::BIND_ADDR) {
            self.server.bind_addr = addr
                .parse()
                .map_err(|e| ServerError::Config(format!("{}: {e}", env::BIND_ADDR)))?;
        }
        if let Some(url) = lookup(env::DATABASE_URL) {
            self.store.database_url = url;
        }
        if let Some(root) = lookup(env::BLOB_ROOT) {
            self.blobs.root = PathBuf::from(root);
        }
        if let Some(ttl) = lookup(env::CACHE_TTL_SECS) {
            self.service.cache_ttl_secs = ttl
                .parse()
                .map_err(|e| ServerError::Config(format!("{}: {e}", env::CACHE_TTL_SECS)))?;
        }
        Ok(())
    }

    /// Switch every backend to its in-memory variant.
    pub fn ephemeral(mut self) -> Self {
        self.store.backend = StoreBackend::Memory;
        self.blobs.backend = BlobBackend::Memory;
        self
    }
}

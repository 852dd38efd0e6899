use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::fetcher::MAX_REDIRECTS;

/// Where fetched responses are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local; gone when the process exits.
    Memory,
    /// JSON files under the XDG cache directory.
    #[default]
    Disk,
    /// Never cache.
    Off,
}

/// Global configuration loaded from `~/.config/brw/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrwConfig {
    /// Maximum number of 301 hops followed by one load.
    pub max_redirects: u32,
    /// Value of the `User-Agent` request header.
    pub user_agent: String,
    /// TCP connect timeout in seconds (None = OS default, may block long).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Socket read/write timeout in seconds (None = block indefinitely).
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
    /// Cache backend: "disk" (default), "memory" or "off".
    #[serde(default)]
    pub cache_backend: Option<CacheBackend>,
    /// Override for the disk cache directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for BrwConfig {
    fn default() -> Self {
        Self {
            max_redirects: MAX_REDIRECTS,
            user_agent: concat!("brw/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: Some(15),
            read_timeout_secs: Some(30),
            cache_backend: None,
            cache_dir: None,
        }
    }
}

impl BrwConfig {
    pub fn cache_backend(&self) -> CacheBackend {
        self.cache_backend.unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("brw")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BrwConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BrwConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: BrwConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

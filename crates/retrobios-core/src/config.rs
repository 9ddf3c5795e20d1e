//! Global configuration loaded from `~/.config/retrobios/config.toml`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Remote repository serving individual BIOS files by path, unauthenticated.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/Abdess/retroarch_system/libretro/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrobiosConfig {
    /// Base URL the per-system subpaths and filenames are joined onto.
    pub base_url: String,
    /// Total per-file transfer timeout in seconds. Generous because BIOS
    /// files can be large.
    pub network_timeout_secs: u64,
    /// Connection-establishment timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Cache directory override (None = the XDG cache dir).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// External catalog file override (None = the builtin table).
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for RetrobiosConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            network_timeout_secs: 60,
            connect_timeout_secs: 15,
            cache_dir: None,
            catalog_path: None,
        }
    }
}

impl RetrobiosConfig {
    /// Effective cache directory: the configured override or the XDG default.
    pub fn resolve_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_cache_dir(),
        }
    }
}

/// Default cache directory under the XDG cache home.
pub fn default_cache_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("retrobios")?;
    Ok(xdg_dirs.get_cache_home())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("retrobios")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RetrobiosConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RetrobiosConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RetrobiosConfig = toml::from_str(&data)?;
    Ok(cfg)
}

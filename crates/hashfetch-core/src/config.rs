use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "HASHFETCH_CONFIG";

/// Content-addressed mirrors tried when an entry has no explicit URL, in priority order.
pub const DEFAULT_MIRRORS: [&str; 2] = [
    "https://s3.amazonaws.com/simpleitk/public/notebooks/%(algo)/%(hash)",
    "https://data.kitware.com/api/v1/file/hashsum/%(algo_lower)/%(hash)/download",
];

/// Global configuration loaded from `~/.config/hashfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Mirror URL templates; `%(hash)`, `%(algo)` and `%(algo_lower)` are substituted.
    pub mirrors: Vec<String>,
    /// Local object-store roots tried after those from `ExternalData_OBJECT_STORES`.
    pub object_stores: Vec<PathBuf>,
    /// Connection timeout per candidate URL, in seconds.
    pub connect_timeout_secs: u64,
    /// Abort a transfer that stays below 1 KiB/s for this many seconds (0 = never).
    pub low_speed_time_secs: u64,
    /// Re-hash cached files on every fetch.
    pub verify: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mirrors: DEFAULT_MIRRORS.iter().map(|s| s.to_string()).collect(),
            object_stores: Vec::new(),
            connect_timeout_secs: 30,
            low_speed_time_secs: 60,
            verify: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(p));
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hashfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

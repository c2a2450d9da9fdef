use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str = "https://ssvid.net/api/ajax/search";
pub const DEFAULT_CONVERT_URL: &str = "https://ssvid.net/api/ajax/convert";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Which `links.mp4` entry to pick from a search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityStrategy {
    /// First entry in the order the upstream document lists them.
    #[default]
    First,
    /// Entry with the largest numeric label (e.g. `1080p` over `720p`).
    Highest,
}

/// Network timeouts (optional `[timeouts]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connect timeout for every request, in seconds.
    pub connect_secs: u64,
    /// Total timeout for the search and convert API calls, in seconds.
    pub request_secs: u64,
    /// A download slower than this many bytes/sec ...
    pub low_speed_bytes: u32,
    /// ... for this many seconds is aborted.
    pub low_speed_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 15,
            request_secs: 30,
            low_speed_bytes: 1024,
            low_speed_secs: 60,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_secs)
    }
}

/// Global configuration loaded from `~/.config/vidl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VidlConfig {
    /// Search endpoint (form POST with `query` and `vt`).
    pub search_url: String,
    /// Convert endpoint (form POST with `vid` and `k`).
    pub convert_url: String,
    /// User-Agent sent to both API endpoints.
    pub user_agent: String,
    pub quality: QualityStrategy,
    /// Receive buffer size in bytes; each chunk is written to disk as it arrives.
    pub chunk_size: usize,
    /// Remove the partially written file when a download fails.
    pub discard_partial: bool,
    /// Line-delimited URL list used by bulk mode.
    pub bulk_file: PathBuf,
    /// Root under which date folders are created (None = working directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub timeouts: TimeoutConfig,
}

impl Default for VidlConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            convert_url: DEFAULT_CONVERT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            quality: QualityStrategy::First,
            chunk_size: 1024,
            discard_partial: false,
            bulk_file: PathBuf::from("file.txt"),
            output_dir: None,
            timeouts: TimeoutConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vidl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VidlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VidlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path (`--config`). The file must exist.
pub fn load_from(path: &Path) -> Result<VidlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: VidlConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Locations of the JSON files and the media output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Source catalog (`[{url, id}]`).
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    /// Extraction cache (`[{id, title, assetUrl}]`).
    #[serde(default = "default_extracted_cache")]
    pub extracted_cache: PathBuf,

    /// Persisted download state (`[{id, title, assetUrl}]`).
    #[serde(default = "default_state")]
    pub state: PathBuf,

    /// Directory downloaded media is written to.
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Browser user agent string sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Total timeout for page fetches and probes, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Maximum idle time between two body chunks of a download, in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,

    /// Lower bound of the random delay before each page fetch.
    #[serde(default = "default_delay_min")]
    pub request_delay_min_ms: u64,

    /// Upper bound of the random delay before each page fetch.
    #[serde(default = "default_delay_max")]
    pub request_delay_max_ms: u64,
}

/// Pipeline options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Maximum number of simultaneous downloads.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Maximum number of simultaneous page fetches during extraction.
    #[serde(default = "default_extract_concurrency")]
    pub extract_concurrency: usize,

    /// Media file extension (without dot) accepted by the extractor.
    #[serde(default = "default_media_extension")]
    pub media_extension: String,

    /// Ignore the extraction cache and re-extract every page.
    #[serde(default)]
    pub refresh_cache: bool,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Whether to log items skipped because they were already downloaded.
    #[serde(default = "default_true")]
    pub show_skipped_downloads: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            extracted_cache: default_extracted_cache(),
            state: default_state(),
            output_directory: default_output_directory(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_seconds: default_connect_timeout(),
            request_timeout_seconds: default_request_timeout(),
            read_timeout_seconds: default_read_timeout(),
            request_delay_min_ms: default_delay_min(),
            request_delay_max_ms: default_delay_max(),
        }
    }
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            extract_concurrency: default_extract_concurrency(),
            media_extension: default_media_extension(),
            refresh_cache: false,
            show_downloads: true,
            show_skipped_downloads: true,
        }
    }
}

fn default_catalog() -> PathBuf {
    PathBuf::from("STC32G_Video.json")
}

fn default_extracted_cache() -> PathBuf {
    PathBuf::from("extracted_video_data.json")
}

fn default_state() -> PathBuf {
    PathBuf::from("save_list_data.json")
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("STCVideo")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.81 Safari/537.36".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_read_timeout() -> u64 {
    60
}

fn default_delay_min() -> u64 {
    400
}

fn default_delay_max() -> u64 {
    750
}

fn default_max_concurrency() -> usize {
    2
}

fn default_extract_concurrency() -> usize {
    1
}

fn default_media_extension() -> String {
    "mp4".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.network.connect_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.request_timeout_seconds)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.network.read_timeout_seconds)
    }
}

//! Process configuration, loaded once at start-up.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `PRODPIC__*` environment variables (`__` separates nested keys, e.g.
//! `PRODPIC__SERVER__PORT=8080`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::crawler::{CrawlerConfig, Workers};
use crate::downloader::DownloaderConfig;

const DEFAULT_CONFIG_FILE: &str = "prodpic";
const CONFIG_PATH_VAR: &str = "PRODPIC_CONFIG";
const ENV_PREFIX: &str = "PRODPIC";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub downloader: DownloadSettings,
    pub crawler: CrawlerSettings,
    pub log: LogConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5002,
        }
    }
}

/// Where images end up and where per-download scratch directories live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persistent directory collecting renamed images
    pub output_dir: PathBuf,
    /// Parent of the `temp_<slot>` scratch directories
    pub temp_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("images1"),
            temp_root: PathBuf::from("."),
        }
    }
}

/// Download behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Images requested from the crawler per call
    pub max_images: usize,
    /// Pause after a successful download, in milliseconds (0 disables it)
    pub throttle_ms: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            max_images: 1,
            throttle_ms: 2000,
        }
    }
}

/// Image search crawler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub min_width: u32,
    pub min_height: u32,
    pub overwrite: bool,
    /// Informational only: result pages are generated in one pass
    pub feeder_threads: usize,
    /// Result pages fetched at once
    pub parser_threads: usize,
    /// Candidate images downloaded at once
    pub downloader_threads: usize,
}


impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/search".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            min_width: 200,
            min_height: 200,
            overwrite: true,
            feeder_threads: 1,
            parser_threads: 1,
            downloader_threads: 1,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Also write a daily rolling log file into this directory
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file (or `PRODPIC_CONFIG`) and environment
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        Self::load_from(path.as_deref()).with_context(|| match &path {
            Some(p) => format!("Failed to load configuration from {}", p.display()),
            None => "Failed to load configuration".to_string(),
        })
    }

    /// Load configuration, reading `path` if given
    ///
    /// An explicit path must exist; the implicit `prodpic.toml` is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Runtime settings for the [`Downloader`](crate::downloader::Downloader)
    #[must_use]
    pub fn downloader_config(&self) -> DownloaderConfig {
        let min_size = if self.crawler.min_width == 0 && self.crawler.min_height == 0 {
            None
        } else {
            Some((self.crawler.min_width, self.crawler.min_height))
        };

        DownloaderConfig {
            output_dir: self.storage.output_dir.clone(),
            temp_root: self.storage.temp_root.clone(),
            min_size,
            overwrite: self.crawler.overwrite,
            throttle: Duration::from_millis(self.downloader.throttle_ms),
        }
    }

    /// Runtime settings for the image crawler
    #[must_use]
    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig {
            base_url: self.crawler.base_url.clone(),
            user_agent: self.crawler.user_agent.clone(),
            timeout: Duration::from_secs(self.crawler.timeout_secs),
            workers: Workers {
                feeder: self.crawler.feeder_threads,
                parser: self.crawler.parser_threads,
                downloader: self.crawler.downloader_threads,
            },
        }
    }
}

//! Image search crawler
//!
//! A crawl runs as a three stage pipeline: the feeder produces result-page
//! URLs for a keyword, the parser pulls candidate image URLs out of each page,
//! and the fetcher downloads candidates into a storage directory until enough
//! images have been kept.

mod feeder;
mod fetcher;
mod google;
mod http;
mod parser;
mod patterns;

#[cfg(test)]
pub mod fake;
#[cfg(test)]
mod tests;

pub use google::{CrawlerConfig, GoogleImageCrawler};
pub use http::HttpClient;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Crawler result type
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Crawler error types
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What to look for and how many images to keep
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Search keyword
    pub keyword: String,
    /// Maximum number of images to save
    pub max_num: usize,
    /// Minimum (width, height); smaller images are discarded
    pub min_size: Option<(u32, u32)>,
    /// Replace files that already exist in the storage directory
    pub overwrite: bool,
}

impl CrawlRequest {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            max_num: 1,
            min_size: None,
            overwrite: false,
        }
    }

    pub fn with_max_num(mut self, max_num: usize) -> Self {
        self.max_num = max_num;
        self
    }

    pub fn with_min_size(mut self, min_size: Option<(u32, u32)>) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Concurrency of each pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workers {
    /// Informational only: the feeder builds every page URL in one pass
    pub feeder: usize,
    pub parser: usize,
    pub downloader: usize,
}

impl Default for Workers {
    fn default() -> Self {
        Self {
            feeder: 1,
            parser: 1,
            downloader: 1,
        }
    }
}

/// Outcome of a crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// Files written to the storage directory, in download order
    pub saved: Vec<PathBuf>,
}

/// Search-and-fetch capability used by the downloader
#[async_trait]
pub trait ImageCrawler: Send + Sync {
    /// Crawler identifier used in logs
    fn name(&self) -> &'static str;

    /// Search for `request.keyword` and store matching images in `root_dir`
    ///
    /// Finding nothing is not an error; the summary is simply empty.
    async fn crawl(&self, request: &CrawlRequest, root_dir: &Path) -> Result<CrawlSummary>;
}

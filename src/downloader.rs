//! Download one image for a search term into the output directory.
//!
//! Every call works inside its own scratch directory (`temp_<slot>`), which is
//! removed before the call returns whatever the outcome.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::crawler::{CrawlError, CrawlRequest, ImageCrawler};

/// Downloader configuration
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Persistent directory collecting renamed images
    pub output_dir: PathBuf,
    /// Parent of the per-slot scratch directories
    pub temp_root: PathBuf,
    /// Minimum (width, height) passed to the crawler
    pub min_size: Option<(u32, u32)>,
    /// Let the crawler replace files in its storage directory
    pub overwrite: bool,
    /// Pause after a successful download
    pub throttle: Duration,
}

/// Download error types
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Failed to create temporary directory {}: {source}", path.display())]
    TempDir { path: PathBuf, source: io::Error },

    #[error("Image search failed: {0}")]
    Crawl(#[from] CrawlError),

    #[error("No images found for: {0}")]
    NoImages(String),

    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Failed to remove temporary directory {}: {source}", path.display())]
    Cleanup { path: PathBuf, source: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Fetches images through an [`ImageCrawler`] and files them under normalized names
pub struct Downloader {
    crawler: Arc<dyn ImageCrawler>,
    config: DownloaderConfig,
    /// Held for a whole download; scratch directories are shared between calls
    busy: Mutex<()>,
}

impl Downloader {
    pub fn new(crawler: Arc<dyn ImageCrawler>, config: DownloaderConfig) -> Self {
        Self {
            crawler,
            config,
            busy: Mutex::new(()),
        }
    }

    pub const fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Scratch directory used by `slot`
    pub fn temp_dir(&self, slot: usize) -> PathBuf {
        self.config.temp_root.join(format!("temp_{slot}"))
    }

    /// Download up to `max_images` images for `search_term`
    ///
    /// Returns the file name (not the path) of the first image placed in the
    /// output directory. Further images get an index suffix. Concurrent calls
    /// run one at a time.
    pub async fn download(
        &self,
        search_term: &str,
        slot: usize,
        max_images: usize,
    ) -> Result<String, DownloadError> {
        let _busy = self.busy.lock().await;
        let temp_dir = self.temp_dir(slot);

        let result = match self.fetch_into(search_term, &temp_dir, max_images).await {
            Ok(filename) => remove_temp_dir(&temp_dir).await.map(|()| filename),
            Err(e) => {
                if let Err(cleanup) = remove_temp_dir(&temp_dir).await {
                    warn!("{}", cleanup);
                }
                Err(e)
            }
        };

        match result {
            Ok(filename) => {
                info!("Successfully downloaded image for: {}", search_term);

                if !self.config.throttle.is_zero() {
                    tokio::time::sleep(self.config.throttle).await;
                }

                Ok(filename)
            }
            Err(e) => {
                error!("Failed to download image for {}: {}", search_term, e);
                Err(e)
            }
        }
    }

    async fn fetch_into(
        &self,
        search_term: &str,
        temp_dir: &Path,
        max_images: usize,
    ) -> Result<String, DownloadError> {
        tokio::fs::create_dir_all(temp_dir)
            .await
            .map_err(|source| DownloadError::TempDir {
                path: temp_dir.to_path_buf(),
                source,
            })?;

        let request = CrawlRequest::new(search_term)
            .with_max_num(max_images)
            .with_min_size(self.config.min_size)
            .with_overwrite(self.config.overwrite);

        let summary = self.crawler.crawl(&request, temp_dir).await?;
        debug!(
            "Crawler {} reported {} saved files",
            self.crawler.name(),
            summary.saved.len()
        );

        let files = list_files(temp_dir).await?;
        if files.is_empty() {
            return Err(DownloadError::NoImages(search_term.to_string()));
        }

        let mut first = None;
        for (index, source) in files.iter().enumerate() {
            let extension = source
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default();

            let filename = if index == 0 {
                normalized_filename(search_term, &extension)
            } else {
                normalized_filename(&format!("{search_term}_{index}"), &extension)
            };

            let target = self.config.output_dir.join(&filename);
            move_file(source, &target).await?;
            debug!("Moved {} -> {}", source.display(), target.display());

            first.get_or_insert(filename);
        }

        first.ok_or_else(|| DownloadError::NoImages(search_term.to_string()))
    }
}

/// Output file name for a search term: spaces become underscores, the
/// extension (including its dot) is appended unchanged.
pub fn normalized_filename(search_term: &str, extension: &str) -> String {
    format!("{}{extension}", search_term.replace(' ', "_"))
}

/// Regular files directly inside `dir`, sorted by name
async fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Rename, falling back to copy + delete across filesystems
async fn move_file(from: &Path, to: &Path) -> Result<(), DownloadError> {
    let err = |source| DownloadError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    tokio::fs::copy(from, to).await.map_err(err)?;
    tokio::fs::remove_file(from).await.map_err(err)?;

    Ok(())
}

async fn remove_temp_dir(path: &Path) -> Result<(), DownloadError> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(DownloadError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}

use super::{
    CrawlRequest, CrawlSummary, HttpClient, ImageCrawler, Result, Workers,
    feeder::Feeder, fetcher, parser,
};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Url;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Google image search crawler configuration
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Search endpoint, e.g. `https://www.google.com/search`
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub workers: Workers,
}

/// Crawls Google image search result pages
pub struct GoogleImageCrawler {
    client: HttpClient,
    feeder: Feeder,
    workers: Workers,
}

impl GoogleImageCrawler {
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let workers = config.workers;
        debug!(
            "Google crawler workers: feeder={}, parser={}, downloader={}",
            workers.feeder, workers.parser, workers.downloader
        );

        Ok(Self {
            client: HttpClient::new(&config.user_agent, config.timeout)?,
            feeder: Feeder::new(&config.base_url)?,
            workers,
        })
    }

    /// Fetch one result page and extract its image URLs
    async fn parse_page(&self, url: Url) -> Result<Vec<String>> {
        let html = self.client.get_text(url.as_str()).await?;
        let urls = parser::extract_image_urls(&html);

        debug!("Parsed {} candidate images from {}", urls.len(), url);

        Ok(urls)
    }

    /// Collect candidate URLs from every result page
    ///
    /// Failing pages are skipped; the crawl only fails if no page could be read.
    async fn collect_candidates(&self, pages: Vec<Url>) -> Result<Vec<String>> {
        let mut candidates = Vec::new();
        let mut first_error = None;
        let mut any_page_ok = false;

        let mut parsed = stream::iter(pages)
            .map(|url| self.parse_page(url))
            .buffered(self.workers.parser.max(1));

        while let Some(result) = parsed.next().await {
            match result {
                Ok(urls) => {
                    any_page_ok = true;
                    candidates.extend(urls);
                }
                Err(e) => {
                    warn!("Failed to parse result page: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if !any_page_ok => Err(e),
            _ => Ok(candidates),
        }
    }
}

#[async_trait]
impl ImageCrawler for GoogleImageCrawler {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn crawl(&self, request: &CrawlRequest, root_dir: &Path) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();

        if request.max_num == 0 {
            return Ok(summary);
        }

        tokio::fs::create_dir_all(root_dir).await?;

        let pages = self.feeder.page_urls(&request.keyword, request.max_num);
        let candidates = self.collect_candidates(pages).await?;

        info!(
            "Found {} candidate images for: {}",
            candidates.len(),
            request.keyword
        );

        let client = &self.client;
        let mut next_index = 1usize;
        let min_size = request.min_size;

        let mut fetched = stream::iter(candidates)
            .map(|url| async move {
                let result = fetcher::fetch(client, &url, min_size).await;
                (url, result)
            })
            .buffered(self.workers.downloader.max(1));

        while let Some((url, result)) = fetched.next().await {
            let image = match result {
                Ok(Some(image)) => image,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Failed to download {}: {}", url, e);
                    continue;
                }
            };

            let index = next_index;
            next_index += 1;
            let path = root_dir.join(format!("{index:06}.{}", image.extension));

            if !request.overwrite && tokio::fs::try_exists(&path).await? {
                debug!("Skipping existing file {}", path.display());
                continue;
            }

            tokio::fs::write(&path, &image.bytes).await?;

            info!("Image #{} saved from {}", index, url);
            summary.saved.push(path);

            if summary.saved.len() >= request.max_num {
                break;
            }
        }

        Ok(summary)
    }
}

//! In-process crawler for tests

use super::{CrawlError, CrawlRequest, CrawlSummary, ImageCrawler, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Writes canned files instead of searching, and records every call
#[derive(Default)]
pub struct FakeCrawler {
    files: Vec<String>,
    fail: bool,
    panic: bool,
    delay: Duration,
    calls: AtomicUsize,
    last_request: Mutex<Option<CrawlRequest>>,
}

impl FakeCrawler {
    /// Crawler that writes one file per name into the storage directory
    pub fn with_files(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(|f| (*f).to_string()).collect(),
            ..Default::default()
        }
    }

    /// Crawler that finds nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Crawler whose search always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Crawler that panics mid-crawl
    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Default::default()
        }
    }

    /// Sleep before writing files, to widen the window for overlapping calls
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CrawlRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageCrawler for FakeCrawler {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn crawl(&self, request: &CrawlRequest, root_dir: &Path) -> Result<CrawlSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if self.panic {
            panic!("crawler exploded for {}", request.keyword);
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail {
            return Err(CrawlError::Http {
                status: 503,
                url: "http://search.invalid/search".to_string(),
            });
        }

        let mut summary = CrawlSummary::default();
        for name in &self.files {
            let path = root_dir.join(name);
            tokio::fs::write(&path, format!("image for {}", request.keyword)).await?;
            summary.saved.push(path);
        }

        Ok(summary)
    }
}

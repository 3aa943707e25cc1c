use crate::crawler::{CrawlError, Result};
use reqwest::Url;

/// Results listed on one search page
const PAGE_SIZE: usize = 100;

/// Produces search result-page URLs for a keyword
#[derive(Debug, Clone)]
pub struct Feeder {
    base_url: Url,
}

impl Feeder {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CrawlError::Config(format!("invalid search url {base_url}: {e}")))?;

        Ok(Self { base_url })
    }

    /// One URL per result page needed to cover `max_num` images
    pub fn page_urls(&self, keyword: &str, max_num: usize) -> Vec<Url> {
        let pages = max_num.div_ceil(PAGE_SIZE);

        (0..pages)
            .map(|page| {
                let mut url = self.base_url.clone();
                url.query_pairs_mut()
                    .append_pair("q", keyword)
                    .append_pair("ijn", &page.to_string())
                    .append_pair("start", &(page * PAGE_SIZE).to_string())
                    .append_pair("tbs", "")
                    .append_pair("tbm", "isch");
                url
            })
            .collect()
    }
}

use crate::crawler::{CrawlError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper shared by the crawler stages
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Execute GET request and return the body as text
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;
        Ok(response.text().await?)
    }

    /// Execute GET request and return the raw body
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CrawlError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

//! arXiv listing source.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;
use url::Url;

use super::{abstract_url, FeedError, ListingRequest, ListingSource};
use crate::config::FeedConfig;

/// Reads listing pages from an arXiv-compatible server
#[derive(Debug, Clone)]
pub struct ArxivListingSource {
    client: Client,
    base_url: Url,
}

impl ArxivListingSource {
    /// Create a source from the feed configuration
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self::with_client(client, config.server_url()?))
    }

    /// Create with a custom HTTP client and server (for testing)
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET a page and return its body, failing on non-success status
    async fn fetch_html(&self, url: Url) -> Result<String, FeedError> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| FeedError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(FeedError::Api(format!(
                "{} returned status: {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::Network(format!("Failed to read response: {}", e)))
    }
}

#[async_trait]
impl ListingSource for ArxivListingSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    async fn fetch_listing(&self, request: &ListingRequest) -> Result<String, FeedError> {
        let url = request.url(&self.base_url)?;
        info!("Checking {}", url);
        self.fetch_html(url).await
    }

    async fn fetch_abstract_page(&self, identifier: &str) -> Result<String, FeedError> {
        let url = abstract_url(&self.base_url, identifier)?;
        info!("Reading {}", url);
        self.fetch_html(url).await
    }
}

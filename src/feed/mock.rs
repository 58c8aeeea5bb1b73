//! Mock listing source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::feed::{FeedError, ListingRequest, ListingSource};

/// A listing source that serves predefined pages by category and by paper.
#[derive(Debug, Default)]
pub struct MockListingSource {
    pages: Mutex<HashMap<String, String>>,
    abstracts: Mutex<HashMap<String, String>>,
}

impl MockListingSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page returned for a category.
    pub fn set_listing(&self, category: &str, html: &str) {
        let mut guard = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert(category.to_string(), html.to_string());
    }

    /// Set the abstract page returned for a paper identifier.
    pub fn set_abstract_page(&self, identifier: &str, html: &str) {
        let mut guard = self.abstracts.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert(identifier.to_string(), html.to_string());
    }

    /// Clear all configured pages.
    pub fn clear(&self) {
        self.pages.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.abstracts.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl ListingSource for MockListingSource {
    fn id(&self) -> &str {
        "mock"
    }

    async fn fetch_listing(&self, request: &ListingRequest) -> Result<String, FeedError> {
        let guard = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(&request.category)
            .cloned()
            .ok_or_else(|| FeedError::Api(format!("No listing for {}", request.category)))
    }

    async fn fetch_abstract_page(&self, identifier: &str) -> Result<String, FeedError> {
        let guard = self.abstracts.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(identifier)
            .cloned()
            .ok_or_else(|| FeedError::Api(format!("No abstract page for {}", identifier)))
    }
}

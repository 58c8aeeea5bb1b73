//! Listing feed: requests, sources and HTML extraction.
//!
//! This is the only part of the crate that touches the network. A
//! [`ListingSource`] returns the raw HTML of a listing page,
//! [`extract_listing`] turns it into the four aligned field sequences of a
//! [`RawListing`], and [`scrape`] runs both for several requests and merges the
//! result into one [`Corpus`](crate::engine::Corpus).
//!
//! # Implementing a New Source
//!
//! 1. Create a struct that implements [`ListingSource`]
//! 2. Return the page HTML from `fetch_listing`
//! 3. Pass it to [`scrape`] like any other source

mod arxiv;
mod extract;
mod request;

pub mod mock;

pub use arxiv::ArxivListingSource;
pub use extract::{extract_abstract_page, extract_listing, RawListing};
pub use mock::MockListingSource;
pub use request::{abstract_url, ListingMode, ListingRequest, MonthSpec, DEFAULT_SHOW};

use async_trait::async_trait;
use tracing::info;

use crate::engine::{Corpus, CorpusBuilder, EngineError};
use crate::models::PaperRecord;

/// A source of listing pages
#[async_trait]
pub trait ListingSource: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs (e.g. "arxiv")
    fn id(&self) -> &str;

    /// Fetch the HTML of one listing page
    async fn fetch_listing(&self, request: &ListingRequest) -> Result<String, FeedError>;

    /// Fetch the HTML of one paper's abstract page
    async fn fetch_abstract_page(&self, identifier: &str) -> Result<String, FeedError>;
}

/// Fetch and extract every request, merging all entries into one corpus.
///
/// An entry listed under several requested categories appears once, resolved
/// by the builder's duplicate policy.
pub async fn scrape(
    source: &dyn ListingSource,
    requests: &[ListingRequest],
    builder: &CorpusBuilder,
) -> Result<Corpus, FeedError> {
    let mut corpus = Corpus::new();

    for request in requests {
        let html = source.fetch_listing(request).await?;
        let listing = extract_listing(&html)?;
        info!(
            source = source.id(),
            category = %request.category,
            entries = listing.len(),
            "Parsed listing"
        );
        listing.build_into(builder, &mut corpus)?;
    }

    Ok(corpus)
}

/// Fetch a single paper by identifier from its abstract page
pub async fn read_paper(
    source: &dyn ListingSource,
    identifier: &str,
    builder: &CorpusBuilder,
) -> Result<PaperRecord, FeedError> {
    let html = source.fetch_abstract_page(identifier).await?;
    let corpus = extract_abstract_page(identifier, &html)?.build(builder)?;
    info!(source = source.id(), paper = identifier, "Read abstract page");

    corpus
        .into_records()
        .into_iter()
        .next()
        .ok_or_else(|| FeedError::Parse(format!("No entry on abstract page of {}", identifier)))
}

/// Errors that can occur when fetching or reading listings
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// The page could not be read as a listing
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Non-success response from the listing server
    #[error("API error: {0}")]
    Api(String),

    /// The extracted fields could not be assembled
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Network(err.to_string())
    }
}

impl From<url::ParseError> for FeedError {
    fn from(err: url::ParseError) -> Self {
        FeedError::InvalidRequest(format!("URL: {}", err))
    }
}

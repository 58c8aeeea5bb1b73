//! Extraction of raw entry fields from listing HTML.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

use super::FeedError;
use crate::engine::{Corpus, CorpusBuilder, EngineError};

/// The four aligned field sequences of a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub numbers: Vec<String>,
    pub titles: Vec<String>,
    /// Raw author blocks, names separated by commas and line breaks
    pub authors: Vec<String>,
    /// Empty string when the listing carries no abstract
    pub abstracts: Vec<String>,
}

impl RawListing {
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn push(
        &mut self,
        number: impl Into<String>,
        title: impl Into<String>,
        authors: impl Into<String>,
        abstract_text: impl Into<String>,
    ) {
        self.numbers.push(number.into());
        self.titles.push(title.into());
        self.authors.push(authors.into());
        self.abstracts.push(abstract_text.into());
    }

    /// Assemble a corpus from the extracted fields
    pub fn build(&self, builder: &CorpusBuilder) -> Result<Corpus, EngineError> {
        builder.build(&self.numbers, &self.titles, &self.authors, &self.abstracts)
    }

    /// Add the extracted entries to an existing corpus
    pub fn build_into(&self, builder: &CorpusBuilder, corpus: &mut Corpus) -> Result<(), EngineError> {
        builder.build_into(corpus, &self.numbers, &self.titles, &self.authors, &self.abstracts)
    }
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d*\.\d+|\d+").expect("valid identifier regex"))
}

fn item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"item(\d+)").expect("valid item regex"))
}

fn selector(css: &str) -> Result<Selector, FeedError> {
    Selector::parse(css).map_err(|e| FeedError::Parse(format!("selector {}: {:?}", css, e)))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text after a `Label:` descriptor, trimmed
fn after_label(text: &str, label: &str) -> String {
    text.rsplit(label).next().unwrap_or(text).trim().to_string()
}

/// Extract every entry of a listing page.
///
/// Entries are `<dt>`/`<dd>` pairs. Identifiers come from
/// `span.list-identifier`, titles from `div.list-title`, author blocks from
/// `div.list-authors` and abstracts from `p.mathjax`. When the page links to
/// a "Replacements" section, entries from that section on are dropped.
pub fn extract_listing(html: &str) -> Result<RawListing, FeedError> {
    let document = Html::parse_document(html);

    let dt_sel = selector("dt")?;
    let dd_sel = selector("dd")?;
    let link_sel = selector("a")?;
    let id_sel = selector("span.list-identifier")?;
    let title_sel = selector("div.list-title")?;
    let authors_sel = selector("div.list-authors")?;
    let abstract_sel = selector("p.mathjax")?;

    let cutoff = document
        .select(&link_sel)
        .filter(|a| text_of(*a).trim().starts_with("Replacement"))
        .find_map(|a| {
            let href = a.value().attr("href")?;
            let caps = item_regex().captures(href)?;
            caps[1].parse::<usize>().ok()
        })
        .map(|item| item.saturating_sub(1));

    let mut listing = RawListing::default();
    let entries = document.select(&dt_sel).zip(document.select(&dd_sel));

    for (dt, dd) in entries.take(cutoff.unwrap_or(usize::MAX)) {
        let id_text = dt
            .select(&id_sel)
            .next()
            .map(text_of)
            .unwrap_or_else(|| text_of(dt));
        let id_text = after_label(&id_text, "arXiv:");
        let Some(number) = identifier_regex().find(&id_text) else {
            return Err(FeedError::Parse(format!(
                "No identifier in listing entry: {:?}",
                id_text
            )));
        };

        let title = dd
            .select(&title_sel)
            .next()
            .map(|t| after_label(&text_of(t), "Title:"))
            .unwrap_or_default();
        let authors = dd
            .select(&authors_sel)
            .next()
            .map(|a| after_label(&text_of(a), "Authors:"))
            .unwrap_or_default();
        let abstract_text = dd
            .select(&abstract_sel)
            .next()
            .map(|p| text_of(p).trim().to_string())
            .unwrap_or_default();

        listing.push(number.as_str(), title, authors, abstract_text);
    }

    debug!(entries = listing.len(), cutoff = ?cutoff, "Extracted listing");
    Ok(listing)
}

/// Extract the single entry of an abstract page (`/abs/{identifier}`).
///
/// The title comes from `h1.title`, the author block from `div.authors` and
/// the abstract from `blockquote.abstract`. A page without a title is not an
/// abstract page and fails with [`FeedError::Parse`].
pub fn extract_abstract_page(identifier: &str, html: &str) -> Result<RawListing, FeedError> {
    let document = Html::parse_document(html);

    let title_sel = selector("h1.title")?;
    let authors_sel = selector("div.authors")?;
    let abstract_sel = selector("blockquote.abstract")?;

    let title = document
        .select(&title_sel)
        .next()
        .map(|t| after_label(&text_of(t), "Title:"))
        .ok_or_else(|| FeedError::Parse(format!("No title on abstract page of {}", identifier)))?;
    let authors = document
        .select(&authors_sel)
        .next()
        .map(|a| after_label(&text_of(a), "Authors:"))
        .unwrap_or_default();
    let abstract_text = document
        .select(&abstract_sel)
        .next()
        .map(|b| after_label(&text_of(b), "Abstract:"))
        .unwrap_or_default();

    let mut listing = RawListing::default();
    listing.push(identifier.trim(), title, authors, abstract_text);
    Ok(listing)
}

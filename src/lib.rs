//! # arXiv Checker
//!
//! Cross check arXiv listings against a watch-list of author names or free-text
//! keywords and report the entries that match.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (PaperRecord, QueryTerm, etc.)
//! - [`engine`]: Name normalization, corpus assembly, query parsing and matching
//! - [`feed`]: Listing page requests, HTML extraction and listing sources
//! - [`utils`]: Report formatting and snapshot persistence
//! - [`config`]: Configuration management
//!
//! ```rust
//! use arxiv_checker::engine::{CorpusBuilder, MatchEngine, QueryMode, QuerySource, parse_query};
//!
//! let corpus = CorpusBuilder::default()
//!     .build(
//!         &["2301.00001"],
//!         &["A Paper"],
//!         &["Jane Doe, Bob Lee"],
//!         &["An abstract."],
//!     )
//!     .unwrap();
//!
//! let terms = parse_query(&QuerySource::literal("Doe, Jane"), QueryMode::Authors).unwrap();
//! let hits = MatchEngine::new(&corpus).match_authors(&terms);
//! assert_eq!(hits.len(), 1);
//! assert!(hits[0].verified);
//! ```

pub mod config;
pub mod engine;
pub mod feed;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use engine::{Corpus, CorpusBuilder, DuplicatePolicy, MatchEngine};
pub use models::{PaperRecord, QueryTerm};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

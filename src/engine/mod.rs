//! Entry normalization and matching engine.
//!
//! Everything in this module is synchronous, in-memory string processing:
//!
//! - [`normalize`]: raw author token -> canonical `surname_I` id and display name
//! - [`CorpusBuilder`]: aligned raw listing fields -> deduplicated [`Corpus`]
//! - [`parse_query`]: path / literal / lines -> [`QueryTerm`](crate::models::QueryTerm)s
//! - [`MatchEngine`]: ranked keyword matches and deduplicated author matches
//!
//! A built [`Corpus`] is never mutated while matching, so it can be shared
//! across threads for concurrent read-only queries.

mod corpus;
mod matcher;
mod names;
mod query;

pub use corpus::{Corpus, CorpusBuilder, DuplicatePolicy, InsertOutcome};
pub use matcher::{AuthorMatch, KeywordMatch, MatchEngine};
pub use names::{canonical_id, normalize, split_author_block, AuthorName};
pub use query::{parse_query, QueryMode, QuerySource};

/// Errors raised by the engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The aligned listing sequences differ in length
    #[error(
        "Shape mismatch: {numbers} numbers, {titles} titles, {authors} author blocks, {abstracts} abstracts"
    )]
    ShapeMismatch {
        numbers: usize,
        titles: usize,
        authors: usize,
        abstracts: usize,
    },

    /// The query input could not be turned into any terms
    #[error("Invalid query source: {0}")]
    InvalidQuerySource(String),
}

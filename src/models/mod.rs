//! Core data models for listing entries and watch-list queries.

mod paper;
mod query;

pub use paper::{PaperRecord, RenderError, RenderedPaper, ABS_URL, DEFAULT_RENDER_WIDTH};
pub use query::{AuthorTerm, FirstName, QueryTerm};

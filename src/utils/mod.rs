//! Utility modules supporting the checker.
//!
//! - [`display_width`] / [`pad_to_width`]: unicode-aware column helpers used by
//!   the paper renderer
//! - [`format_keyword_report`] / [`format_author_report`]: terminal reports for
//!   match results
//! - [`save_snapshot`] / [`load_snapshot`]: keep a scraped corpus on disk
//!
//! # Snapshots
//!
//! ```rust,no_run
//! use arxiv_checker::utils::{load_snapshot, save_snapshot};
//! use arxiv_checker::DuplicatePolicy;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let corpus = load_snapshot(Path::new("today.json"), DuplicatePolicy::KeepFirst)?;
//! save_snapshot(&corpus, Path::new("backup.json"))?;
//! # Ok(())
//! # }
//! ```

mod display;
mod snapshot;

pub use display::{
    display_width, format_author_report, format_keyword_report, is_terminal, pad_to_width,
};
pub use snapshot::{load_snapshot, save_snapshot, SnapshotError};

//! Corpus snapshots on disk.
//!
//! A snapshot is a JSON array of paper records, written in corpus order, so a
//! scrape can be matched again later without touching the network.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::engine::{Corpus, DuplicatePolicy};
use crate::models::PaperRecord;

/// Snapshot errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        SnapshotError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Write every record of `corpus` to `path`, replacing any existing file
pub fn save_snapshot(corpus: &Corpus, path: &Path) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| SnapshotError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let records: Vec<&PaperRecord> = corpus.iter().collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush().map_err(|e| SnapshotError::io(path, e))?;

    info!(papers = corpus.len(), path = %path.display(), "Saved snapshot");
    Ok(())
}

/// Read a snapshot back into a corpus.
///
/// Author indexes are rebuilt from the stored roster and ids; repeated
/// identifiers are resolved with `policy`.
pub fn load_snapshot(path: &Path, policy: DuplicatePolicy) -> Result<Corpus, SnapshotError> {
    let file = File::open(path).map_err(|e| SnapshotError::io(path, e))?;
    let records: Vec<PaperRecord> = serde_json::from_reader(BufReader::new(file))?;
    let corpus = Corpus::from_records(records, policy);

    info!(papers = corpus.len(), path = %path.display(), "Loaded snapshot");
    Ok(corpus)
}

//! Corpus assembly from aligned listing fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::names::{normalize, split_author_block};
use super::EngineError;
use crate::models::PaperRecord;

/// Strategy for an identifier that is listed more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first occurrence, skip later ones
    #[default]
    KeepFirst,
    /// Keep the first occurrence and append authors it does not list yet
    MergeAuthors,
}

/// What happened to a record handed to [`Corpus::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Skipped,
    /// Merged into an existing record, with the number of authors added
    Merged(usize),
}

/// Insertion-ordered set of papers keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    papers: Vec<PaperRecord>,
    index: HashMap<String, usize>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&PaperRecord> {
        self.index.get(identifier).map(|&i| &self.papers[i])
    }

    /// Papers in the order they were first listed
    pub fn iter(&self) -> std::slice::Iter<'_, PaperRecord> {
        self.papers.iter()
    }

    /// Papers in chronological (identifier) order
    pub fn sorted(&self) -> Vec<&PaperRecord> {
        let mut papers: Vec<&PaperRecord> = self.papers.iter().collect();
        papers.sort();
        papers
    }

    /// Add a record, resolving a repeated identifier with `policy`
    pub fn insert(&mut self, paper: PaperRecord, policy: DuplicatePolicy) -> InsertOutcome {
        let Some(existing) = self.index.get(&paper.identifier).copied() else {
            self.index.insert(paper.identifier.clone(), self.papers.len());
            self.papers.push(paper);
            return InsertOutcome::Inserted;
        };

        match policy {
            DuplicatePolicy::KeepFirst => InsertOutcome::Skipped,
            DuplicatePolicy::MergeAuthors => {
                let target = &mut self.papers[existing];
                let mut added = 0;
                for (id, name) in paper.author_ids.into_iter().zip(paper.authors) {
                    if !target.has_author(&id) {
                        target.add_author(super::AuthorName {
                            canonical_id: id,
                            display_name: name,
                            ambiguous: false,
                        });
                        added += 1;
                    }
                }
                InsertOutcome::Merged(added)
            }
        }
    }

    /// Merge every record of `other` into this corpus
    pub fn extend(&mut self, other: Corpus, policy: DuplicatePolicy) {
        for paper in other.papers {
            self.insert(paper, policy);
        }
    }

    pub fn into_records(self) -> Vec<PaperRecord> {
        self.papers
    }

    /// Build a corpus from records, restoring each roster index
    pub fn from_records(records: Vec<PaperRecord>, policy: DuplicatePolicy) -> Self {
        let mut corpus = Self::new();
        for mut paper in records {
            paper.reindex();
            corpus.insert(paper, policy);
        }
        corpus
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a PaperRecord;
    type IntoIter = std::slice::Iter<'a, PaperRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.papers.iter()
    }
}

/// Assembles a [`Corpus`] from the four aligned raw listing sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusBuilder {
    policy: DuplicatePolicy,
}

impl CorpusBuilder {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Build a corpus; index `i` of every slice describes the same entry.
    ///
    /// Fails with [`EngineError::ShapeMismatch`] before building anything if
    /// the slices differ in length.
    pub fn build<N, T, A, B>(
        &self,
        numbers: &[N],
        titles: &[T],
        author_blocks: &[A],
        abstracts: &[B],
    ) -> Result<Corpus, EngineError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut corpus = Corpus::new();
        self.build_into(&mut corpus, numbers, titles, author_blocks, abstracts)?;
        Ok(corpus)
    }

    /// Like [`CorpusBuilder::build`], adding to an existing corpus
    pub fn build_into<N, T, A, B>(
        &self,
        corpus: &mut Corpus,
        numbers: &[N],
        titles: &[T],
        author_blocks: &[A],
        abstracts: &[B],
    ) -> Result<(), EngineError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let n = numbers.len();
        if titles.len() != n || author_blocks.len() != n || abstracts.len() != n {
            return Err(EngineError::ShapeMismatch {
                numbers: n,
                titles: titles.len(),
                authors: author_blocks.len(),
                abstracts: abstracts.len(),
            });
        }

        let mut skipped = 0;
        for i in 0..n {
            let number = numbers[i].as_ref().trim();
            let authors: Vec<_> = split_author_block(author_blocks[i].as_ref())
                .into_iter()
                .map(normalize)
                .collect();

            if authors.is_empty() {
                warn!(paper = number, "Listing entry has no authors");
            }
            for author in authors.iter().filter(|a| a.ambiguous) {
                warn!(paper = number, author = %author.display_name, "Ambiguous author name");
            }

            let paper = PaperRecord::new(
                number,
                collapse_whitespace(titles[i].as_ref()),
                abstracts[i].as_ref().trim(),
                authors,
            );

            if corpus.insert(paper, self.policy) != InsertOutcome::Inserted {
                skipped += 1;
            }
        }

        debug!(
            entries = n,
            duplicates = skipped,
            total = corpus.len(),
            "Built corpus"
        );
        Ok(())
    }
}

/// Listing titles wrap across lines; keep them on one
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

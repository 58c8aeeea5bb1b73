//! Matching of parsed queries against a corpus.

use tracing::debug;

use super::Corpus;
use crate::models::{AuthorTerm, FirstName, PaperRecord, QueryTerm};

/// A paper hit by a keyword query
#[derive(Debug, Clone)]
pub struct KeywordMatch<'c> {
    /// Total occurrences of all terms
    pub score: usize,
    /// Terms with at least one occurrence, in query order
    pub terms: Vec<String>,
    pub paper: &'c PaperRecord,
}

/// A paper hit by an author query
#[derive(Debug, Clone)]
pub struct AuthorMatch<'c> {
    pub paper: &'c PaperRecord,
    /// Display names on the paper that matched a term
    pub authors: Vec<String>,
    /// `false` when every matching term was a wildcard, i.e. the hit rests on
    /// surname and initial alone
    pub verified: bool,
}

/// Evaluates queries against a corpus without mutating it
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine<'c> {
    corpus: &'c Corpus,
}

impl<'c> MatchEngine<'c> {
    pub fn new(corpus: &'c Corpus) -> Self {
        Self { corpus }
    }

    /// Rank papers by total keyword occurrences.
    ///
    /// Occurrences are non-overlapping substring counts in
    /// [`PaperRecord::search_string`]. Papers with a zero score are dropped;
    /// equal scores keep corpus order. Author terms are ignored.
    pub fn match_keywords(&self, terms: &[QueryTerm]) -> Vec<KeywordMatch<'c>> {
        let keywords: Vec<&str> = terms
            .iter()
            .filter_map(QueryTerm::as_keyword)
            .filter(|k| !k.is_empty())
            .collect();

        let mut matches: Vec<KeywordMatch<'c>> = self
            .corpus
            .iter()
            .filter_map(|paper| {
                let haystack = paper.search_string();
                let hits: Vec<(usize, &str)> = keywords
                    .iter()
                    .map(|k| (haystack.matches(k).count(), *k))
                    .filter(|(count, _)| *count > 0)
                    .collect();

                let score: usize = hits.iter().map(|(count, _)| count).sum();
                (score > 0).then(|| KeywordMatch {
                    score,
                    terms: hits.into_iter().map(|(_, k)| k.to_string()).collect(),
                    paper,
                })
            })
            .collect();

        // Stable: ties stay in corpus order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            papers = self.corpus.len(),
            keywords = keywords.len(),
            matches = matches.len(),
            "Keyword search finished"
        );
        matches
    }

    /// Find papers listing any of the authors, each paper at most once.
    ///
    /// A concrete first name must appear (case-insensitively) in the matched
    /// display name; wildcard terms accept any id match and leave it
    /// unverified. Results follow corpus order. Keyword terms are ignored.
    pub fn match_authors(&self, terms: &[QueryTerm]) -> Vec<AuthorMatch<'c>> {
        let authors: Vec<&AuthorTerm> = terms.iter().filter_map(QueryTerm::as_author).collect();

        let matches: Vec<AuthorMatch<'c>> = self
            .corpus
            .iter()
            .filter_map(|paper| {
                let mut hit: Option<AuthorMatch<'c>> = None;
                for term in &authors {
                    for (name, verified) in match_author(paper, term) {
                        let entry = hit.get_or_insert_with(|| AuthorMatch {
                            paper,
                            authors: Vec::new(),
                            verified: false,
                        });
                        entry.verified |= verified;
                        if !entry.authors.contains(&name) {
                            entry.authors.push(name);
                        }
                    }
                }
                hit
            })
            .collect();

        debug!(
            papers = self.corpus.len(),
            authors = authors.len(),
            matches = matches.len(),
            unverified = matches.iter().filter(|m| !m.verified).count(),
            "Author search finished"
        );
        matches
    }
}

/// Roster names on `paper` matched by `term`, in roster order, with their
/// verification flag
fn match_author(paper: &PaperRecord, term: &AuthorTerm) -> Vec<(String, bool)> {
    let surname = fold(&term.surname);
    let wanted = term.canonical_id();

    let id_matches = |id: &str| match &wanted {
        Some(wanted) => id == wanted || fold(id) == fold(wanted),
        None => id
            .rsplit_once('_')
            .is_some_and(|(id_surname, _)| fold(id_surname) == surname),
    };

    let mut seen: Vec<&str> = Vec::new();
    let mut names = Vec::new();
    for id in &paper.author_ids {
        if seen.contains(&id.as_str()) || !id_matches(id) {
            continue;
        }
        seen.push(id);

        let Some(name) = paper.author_index.get(id) else {
            continue;
        };
        match &term.first_name {
            FirstName::Fragment(first) => {
                if name.to_lowercase().contains(first.as_str()) {
                    names.push((name.clone(), true));
                }
            }
            FirstName::Wildcard => names.push((name.clone(), false)),
        }
    }
    names
}

/// Surnames compare with hyphens and underscores treated alike
fn fold(s: &str) -> String {
    s.replace('-', "_")
}

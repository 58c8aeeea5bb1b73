//! Watch-list query parsing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::EngineError;
use crate::models::{AuthorTerm, QueryTerm};

/// Where query lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// A file with one term per line
    Path(PathBuf),
    /// A single term
    Literal(String),
    /// In-memory terms, one per entry
    Lines(Vec<String>),
}

impl QuerySource {
    /// Interpret a command-line value: an existing path is read as a file,
    /// anything else is a literal term.
    pub fn probe(value: &str) -> Self {
        if Path::new(value).exists() {
            QuerySource::Path(PathBuf::from(value))
        } else {
            QuerySource::Literal(value.to_string())
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        QuerySource::Literal(value.into())
    }

    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QuerySource::Lines(lines.into_iter().map(Into::into).collect())
    }

    /// Resolve to stripped, lower-cased, non-blank lines
    pub fn resolve(&self) -> Result<Vec<String>, EngineError> {
        let raw: Vec<String> = match self {
            QuerySource::Path(path) => std::fs::read_to_string(path)
                .map_err(|e| {
                    EngineError::InvalidQuerySource(format!("{}: {}", path.display(), e))
                })?
                .lines()
                .map(str::to_string)
                .collect(),
            QuerySource::Literal(value) => vec![value.clone()],
            QuerySource::Lines(lines) => lines.clone(),
        };

        let lines: Vec<String> = raw
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(EngineError::InvalidQuerySource(
                "query contains no terms".to_string(),
            ));
        }
        Ok(lines)
    }
}

/// How query lines are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Free-text substrings
    Keywords,
    /// `Surname, First` lines
    Authors,
}

/// Parse a query source into terms, dropping repeated terms
pub fn parse_query(source: &QuerySource, mode: QueryMode) -> Result<Vec<QueryTerm>, EngineError> {
    let lines = source.resolve()?;

    let mut terms = Vec::with_capacity(lines.len());
    let mut push = |term: QueryTerm| {
        if !terms.contains(&term) {
            terms.push(term);
        }
    };

    for line in &lines {
        match mode {
            QueryMode::Keywords => {
                for keyword in keyword_variants(line) {
                    push(QueryTerm::Keyword(keyword));
                }
            }
            QueryMode::Authors => match parse_author_line(line) {
                Some(term) => push(QueryTerm::Author(term)),
                None => warn!(line = %line, "Skipping author query without a surname"),
            },
        }
    }

    debug!(?mode, lines = lines.len(), terms = terms.len(), "Parsed query");
    Ok(terms)
}

/// The line itself, plus `"first last"` and `"last_f"` for `"last, first"` lines
fn keyword_variants(line: &str) -> Vec<String> {
    let mut variants = vec![line.to_string()];

    if let Some((last, first)) = surname_and_first(line) {
        if let (false, Some(initial)) = (last.is_empty(), first.chars().next()) {
            variants.push(format!("{} {}", first, last));
            variants.push(format!("{}_{}", last, initial));
        }
    }

    variants
}

/// Split `"surname, first[, suffix]"`; anything after a second comma is ignored
fn surname_and_first(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(',');
    let surname = parts.next()?.trim();
    let first = parts.next()?.trim();
    Some((surname, first))
}

/// Parse `"surname, first"`; a line without a first name becomes a wildcard
fn parse_author_line(line: &str) -> Option<AuthorTerm> {
    let (surname, first) = surname_and_first(line).unwrap_or((line.trim(), ""));

    if surname.is_empty() {
        return None;
    }

    let term = AuthorTerm::new(surname, first);
    if term.is_wildcard() {
        warn!(
            author = %surname,
            "No first name given, matches will be unverified"
        );
    }
    Some(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FirstName;
    use std::io::Write;

    fn keywords(source: QuerySource) -> Vec<String> {
        parse_query(&source, QueryMode::Keywords)
            .unwrap()
            .iter()
            .filter_map(|t| t.as_keyword().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_literal_keyword() {
        assert_eq!(keywords(QuerySource::literal("  Dark Matter ")), vec!["dark matter"]);
    }

    #[test]
    fn test_keyword_with_comma_adds_author_variants() {
        assert_eq!(
            keywords(QuerySource::literal("Doe, Jane")),
            vec!["doe, jane", "jane doe", "doe_j"]
        );
    }

    #[test]
    fn test_keyword_with_trailing_comma_has_no_variants() {
        assert_eq!(keywords(QuerySource::literal("doe,")), vec!["doe,"]);
    }

    #[test]
    fn test_lines_are_deduplicated_and_blank_lines_dropped() {
        let source = QuerySource::lines(["Galaxy", "", "galaxy ", "  ", "quasar"]);
        assert_eq!(keywords(source), vec!["galaxy", "quasar"]);
    }

    #[test]
    fn test_path_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Doe, Jane").unwrap();
        writeln!(file, "Smith").unwrap();
        writeln!(file).unwrap();

        let source = QuerySource::probe(file.path().to_str().unwrap());
        assert!(matches!(source, QuerySource::Path(_)));

        let terms = parse_query(&source, QueryMode::Authors).unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0], QueryTerm::Author(AuthorTerm::new("doe", "jane")));
        assert_eq!(terms[1], QueryTerm::Author(AuthorTerm::wildcard("smith")));
    }

    #[test]
    fn test_probe_falls_back_to_literal() {
        let source = QuerySource::probe("/definitely/not/a/real/path.txt");
        assert_eq!(
            source,
            QuerySource::Literal("/definitely/not/a/real/path.txt".to_string())
        );
    }

    #[test]
    fn test_unreadable_path_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let source = QuerySource::Path(dir.path().to_path_buf());
        assert!(matches!(
            parse_query(&source, QueryMode::Keywords),
            Err(EngineError::InvalidQuerySource(_))
        ));
    }

    #[test]
    fn test_empty_query_is_invalid() {
        assert!(matches!(
            parse_query(&QuerySource::lines(Vec::<String>::new()), QueryMode::Keywords),
            Err(EngineError::InvalidQuerySource(_))
        ));
        assert!(matches!(
            parse_query(&QuerySource::literal("   "), QueryMode::Authors),
            Err(EngineError::InvalidQuerySource(_))
        ));
    }

    #[test]
    fn test_author_lines() {
        let terms = parse_query(
            &QuerySource::lines(["Doe, Jane", "Smith,", "Lee", ", Nobody"]),
            QueryMode::Authors,
        )
        .unwrap();

        let authors: Vec<&AuthorTerm> = terms.iter().filter_map(|t| t.as_author()).collect();
        assert_eq!(authors.len(), 3);

        assert_eq!(authors[0].surname, "doe");
        assert_eq!(authors[0].initial, Some('J'));
        assert_eq!(authors[0].first_name, FirstName::Fragment("jane".to_string()));

        assert_eq!(authors[1].surname, "smith");
        assert!(authors[1].is_wildcard());

        assert_eq!(authors[2].surname, "lee");
        assert!(authors[2].is_wildcard());
    }

    #[test]
    fn test_text_after_second_comma_is_ignored() {
        let terms = parse_query(&QuerySource::literal("Doe, Jane, PhD"), QueryMode::Authors).unwrap();
        let author = terms[0].as_author().unwrap();
        assert_eq!(author.surname, "doe");
        assert_eq!(author.first_name, FirstName::Fragment("jane".to_string()));

        assert_eq!(
            keywords(QuerySource::literal("Doe, Jane, PhD")),
            vec!["doe, jane, phd", "jane doe", "doe_j"]
        );
    }
}

//! Terminal display helpers for match reports.
//!
//! Width handling is unicode-aware so rendered boxes line up for titles and
//! names with accented or wide characters.

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

use crate::engine::{AuthorMatch, KeywordMatch};

static STDOUT_IS_TTY: OnceLock<bool> = OnceLock::new();

/// Whether stdout is a terminal, checked once
pub fn is_terminal() -> bool {
    *STDOUT_IS_TTY.get_or_init(|| io::stdout().is_terminal())
}

/// Display width of `text` in terminal columns
#[inline]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Right-pad `text` with spaces to `width` columns.
///
/// Text already at or beyond `width` is returned unchanged.
///
/// ```
/// use arxiv_checker::utils::pad_to_width;
///
/// assert_eq!(pad_to_width("ab", 4), "ab  ");
/// assert_eq!(pad_to_width("abcdef", 4), "abcdef");
/// ```
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = display_width(text);
    if current >= width {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(width - current))
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Format ranked keyword matches, best first
pub fn format_keyword_report(matches: &[KeywordMatch<'_>], width: usize, color: bool) -> String {
    if matches.is_empty() {
        return "No results.\n".to_string();
    }

    let mut out = heading(
        &format!("Found {}", plural(matches.len(), "paper")),
        color,
    );
    out.push('\n');

    for m in matches {
        let summary = format!("{}: {}", plural(m.score, "hit"), m.terms.join(", "));
        out.push('\n');
        if color {
            out.push_str(&summary.green().to_string());
        } else {
            out.push_str(&summary);
        }
        out.push_str(&m.paper.render(width));
    }
    out
}

/// Format author matches in corpus order.
///
/// Matches that rest only on surname and initial are flagged as unverified.
pub fn format_author_report(matches: &[AuthorMatch<'_>], width: usize, color: bool) -> String {
    if matches.is_empty() {
        return "No results.\n".to_string();
    }

    let mut out = heading(
        &format!("Found {}", plural(matches.len(), "paper")),
        color,
    );
    out.push('\n');

    for m in matches {
        let mut summary = format!("Matched: {}", m.authors.join(", "));
        if !m.verified {
            summary.push_str(" (unverified)");
        }
        out.push('\n');
        match (color, m.verified) {
            (false, _) => out.push_str(&summary),
            (true, true) => out.push_str(&summary.green().to_string()),
            (true, false) => out.push_str(&summary.yellow().to_string()),
        }
        out.push_str(&m.paper.render(width));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{normalize, Corpus, DuplicatePolicy, MatchEngine};
    use crate::models::{AuthorTerm, PaperRecord, QueryTerm};

    fn corpus() -> Corpus {
        let mut corpus = Corpus::new();
        corpus.insert(
            PaperRecord::new(
                "2301.00001",
                "Dust in disks",
                "We study dust.",
                vec![normalize("Jane Doe"), normalize("Bob Lee")],
            ),
            DuplicatePolicy::KeepFirst,
        );
        corpus
    }

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("Müller"), 6);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("é", 3), "é  ");
        assert_eq!(pad_to_width("", 2), "  ");
    }

    #[test]
    fn test_keyword_report() {
        let corpus = corpus();
        let matches = MatchEngine::new(&corpus)
            .match_keywords(&[QueryTerm::Keyword("dust".to_string())]);
        let report = format_keyword_report(&matches, 40, false);

        assert!(report.starts_with("Found 1 paper\n"));
        assert!(report.contains("2 hits: dust"));
        assert!(report.contains("https://arxiv.org/abs/2301.00001"));
    }

    #[test]
    fn test_author_report_marks_unverified() {
        let corpus = corpus();
        let engine = MatchEngine::new(&corpus);

        let verified =
            engine.match_authors(&[QueryTerm::Author(AuthorTerm::new("doe", "jane"))]);
        let report = format_author_report(&verified, 40, false);
        assert!(report.contains("Matched: Jane Doe\n"));

        let wildcard = engine.match_authors(&[QueryTerm::Author(AuthorTerm::wildcard("lee"))]);
        let report = format_author_report(&wildcard, 40, false);
        assert!(report.contains("Matched: Bob Lee (unverified)"));
    }

    #[test]
    fn test_empty_reports() {
        assert_eq!(format_keyword_report(&[], 80, true), "No results.\n");
        assert_eq!(format_author_report(&[], 80, false), "No results.\n");
    }
}

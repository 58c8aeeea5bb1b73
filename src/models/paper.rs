//! Paper model representing one entry of an arXiv listing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::engine::AuthorName;
use crate::utils::{display_width, pad_to_width};

/// Base URL for arXiv abstract pages
pub const ABS_URL: &str = "https://arxiv.org/abs";

/// Column width of the boxed rendering used by `Display`
pub const DEFAULT_RENDER_WIDTH: usize = 80;

/// Narrowest box the renderer will produce
const MIN_RENDER_WIDTH: usize = 8;

const PAD_CHAR: char = '%';
const PAD_LEFT: &str = "%%%    ";
const PAD_RIGHT: &str = "    %%%";
/// Marks a field line that continues on the next line (U+2010 HYPHEN)
const CONTINUATION: char = '\u{2010}';

/// A single entry scraped from a listing
///
/// Equality is defined by the identifier alone. Ordering interprets the
/// identifier as a decimal number (`2301.00001 < 2301.00002 < 2302.00001`),
/// which is chronological within one identifier scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// arXiv number (e.g. "2301.12345")
    pub identifier: String,

    /// Paper title
    pub title: String,

    /// Abstract text, empty if the listing did not carry one
    #[serde(default)]
    pub r#abstract: String,

    /// Author display names in listing order
    pub authors: Vec<String>,

    /// Canonical `surname_I` ids, index-aligned with `authors`
    pub author_ids: Vec<String>,

    /// Canonical id -> display name
    #[serde(default)]
    pub author_index: HashMap<String, String>,
}

impl PaperRecord {
    /// Create a record from already-normalized author names
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        authors: Vec<AuthorName>,
    ) -> Self {
        let mut paper = Self {
            identifier: identifier.into(),
            title: title.into(),
            r#abstract: abstract_text.into(),
            authors: Vec::with_capacity(authors.len()),
            author_ids: Vec::with_capacity(authors.len()),
            author_index: HashMap::with_capacity(authors.len()),
        };
        for author in authors {
            paper.add_author(author);
        }
        paper
    }

    /// Link to the abstract page
    pub fn link(&self) -> String {
        format!("{}/{}", ABS_URL, self.identifier)
    }

    /// Whether the roster contains the canonical id
    pub fn has_author(&self, canonical_id: &str) -> bool {
        self.author_index.contains_key(canonical_id)
    }

    /// Append an author to the roster.
    ///
    /// A canonical id that is already present keeps its position in
    /// `author_ids` but the index entry is overwritten (last write wins).
    pub fn add_author(&mut self, author: AuthorName) {
        self.author_index
            .insert(author.canonical_id.clone(), author.display_name.clone());
        self.author_ids.push(author.canonical_id);
        self.authors.push(author.display_name);
    }

    /// Remove every roster entry carrying the canonical id.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_author(&mut self, canonical_id: &str) -> bool {
        if self.author_index.remove(canonical_id).is_none() {
            return false;
        }

        let (ids, names): (Vec<_>, Vec<_>) = self
            .author_ids
            .drain(..)
            .zip(self.authors.drain(..))
            .filter(|(id, _)| id != canonical_id)
            .unzip();
        self.author_ids = ids;
        self.authors = names;
        true
    }

    /// Restore the `author_index` invariant after deserialization.
    ///
    /// Every id in `author_ids` must be a key of `author_index`; missing keys
    /// are filled from the aligned display name.
    pub(crate) fn reindex(&mut self) {
        for (id, name) in self.author_ids.iter().zip(&self.authors) {
            self.author_index
                .entry(id.clone())
                .or_insert_with(|| name.clone());
        }
    }

    /// Lower-cased text searched by keyword queries
    pub fn search_string(&self) -> String {
        let mut parts = Vec::with_capacity(3 + self.author_ids.len() + self.authors.len());
        parts.push(self.r#abstract.to_lowercase());
        parts.push(self.title.to_lowercase());
        parts.push(self.identifier.to_lowercase());
        parts.extend(self.author_ids.iter().map(|a| a.to_lowercase()));
        parts.extend(self.authors.iter().map(|a| a.to_lowercase()));
        parts.join("  ")
    }

    /// Author list as displayed: "A", "A, & B", "A, B, & C"
    pub fn author_line(&self) -> String {
        match self.authors.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{}, & {}", rest.join(", "), last),
        }
    }

    /// Render the record as a `%`-bordered box `width` columns wide
    pub fn render(&self, width: usize) -> String {
        let width = width.max(MIN_RENDER_WIDTH);
        let inner = PAD_LEFT.len() + width + PAD_RIGHT.len();
        let border: String = std::iter::repeat(PAD_CHAR).take(inner).collect();
        let blank = format!("{}{}{}", PAD_LEFT, " ".repeat(width), PAD_RIGHT);

        let mut lines = vec![border.clone(), blank.clone()];
        for field in [self.title.clone(), self.link(), self.author_line()] {
            lines.extend(
                wrap_field(&field, width)
                    .into_iter()
                    .map(|l| format!("{}{}{}", PAD_LEFT, l, PAD_RIGHT)),
            );
            lines.push(blank.clone());
        }
        lines.push(border);

        format!("\n{}\n\n", lines.join("\n"))
    }

    /// Recover title, link and author names from [`PaperRecord::render`] output
    pub fn parse_rendered(text: &str) -> Result<RenderedPaper, RenderError> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        let is_border = |l: &&str| l.chars().all(|c| c == PAD_CHAR);

        let first = lines.iter().position(is_border).ok_or(RenderError::MissingBorder)?;
        let last = lines.iter().rposition(is_border).ok_or(RenderError::MissingBorder)?;
        if last <= first {
            return Err(RenderError::MissingBorder);
        }

        let width = lines[first]
            .chars()
            .count()
            .checked_sub(PAD_LEFT.len() + PAD_RIGHT.len())
            .ok_or(RenderError::MissingBorder)?;

        let body = lines[first + 1..last]
            .iter()
            .map(|l| {
                l.strip_prefix(PAD_LEFT)
                    .and_then(|l| l.strip_suffix(PAD_RIGHT))
                    .ok_or_else(|| RenderError::BadPadding(l.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut cursor = 0;
        let mut fields = Vec::with_capacity(3);
        for _ in 0..3 {
            match body.get(cursor) {
                Some(line) if line.trim().is_empty() => cursor += 1,
                _ => return Err(RenderError::Truncated),
            }

            let mut field = String::new();
            loop {
                let line = body.get(cursor).ok_or(RenderError::Truncated)?;
                cursor += 1;
                let trimmed = line.trim_end_matches(' ');
                match trimmed.strip_suffix(CONTINUATION) {
                    Some(head) if display_width(line) == width => field.push_str(head),
                    _ => {
                        field.push_str(trimmed);
                        break;
                    }
                }
            }
            fields.push(field);
        }

        let authors_line = fields.pop().unwrap_or_default();
        let link = fields.pop().unwrap_or_default();
        let title = fields.pop().unwrap_or_default();

        Ok(RenderedPaper {
            title,
            link,
            authors: split_author_line(&authors_line),
        })
    }

    /// Numeric sort key: integer part and fractional digits
    fn numeric_key(&self) -> Option<(u64, &str)> {
        let (int_part, frac_part) = match self.identifier.split_once('.') {
            Some((i, f)) => (i, f),
            None => (self.identifier.as_str(), ""),
        };
        if !frac_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        int_part.parse().ok().map(|i| (i, frac_part))
    }
}

/// Split a field into padded lines of exactly `width` columns.
///
/// Every line except the last ends in the continuation mark, and the last
/// never does.
fn wrap_field(text: &str, width: usize) -> Vec<String> {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = flat.chars().collect();
    let mut rest = &chars[..];
    let mut lines = Vec::new();

    // a field ending in the mark itself gets one more wrap so it is not read
    // back as a continuation
    while display_width(&rest.iter().collect::<String>()) > width
        || rest.last() == Some(&CONTINUATION)
    {
        let mut used = 0;
        let mut take = 0;
        for c in rest {
            let w = unicode_width::UnicodeWidthChar::width(*c).unwrap_or(1);
            if used + w > width - 1 {
                break;
            }
            used += w;
            take += 1;
        }
        let take = take.max(1);
        let mut line: String = rest[..take].iter().collect();
        line.push(CONTINUATION);
        lines.push(pad_to_width(&line, width));
        rest = &rest[take..];
    }

    lines.push(pad_to_width(&rest.iter().collect::<String>(), width));
    lines
}

fn split_author_line(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    match line.rsplit_once(", & ") {
        Some((head, last)) => head
            .split(", ")
            .chain(std::iter::once(last))
            .map(str::to_string)
            .collect(),
        None => vec![line.to_string()],
    }
}

/// Fields recovered from a rendered record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPaper {
    pub title: String,
    pub link: String,
    pub authors: Vec<String>,
}

/// Errors reading back a rendered record
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Rendered paper has no border")]
    MissingBorder,

    #[error("Rendered paper ends before all fields were read")]
    Truncated,

    #[error("Line is not padded like a rendered paper: {0}")]
    BadPadding(String),
}

impl fmt::Display for PaperRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_RENDER_WIDTH))
    }
}

impl PartialEq for PaperRecord {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for PaperRecord {}

impl PartialOrd for PaperRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PaperRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // numeric ids sort before non-numeric ones
        let numeric = match (self.numeric_key(), other.numeric_key()) {
            (Some((ia, fa)), Some((ib, fb))) => ia.cmp(&ib).then_with(|| cmp_fraction(fa, fb)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        numeric.then_with(|| self.identifier.cmp(&other.identifier))
    }
}

/// Compare digit strings as decimal fractions ("1" == "10" > "09")
fn cmp_fraction(a: &str, b: &str) -> Ordering {
    let len = a.len().max(b.len());
    let pad = |s: &str| format!("{:0<len$}", s, len = len);
    pad(a).cmp(&pad(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize;

    fn paper(id: &str, title: &str, authors: &[&str]) -> PaperRecord {
        PaperRecord::new(
            id,
            title,
            "An abstract.",
            authors.iter().map(|a| normalize(a)).collect(),
        )
    }

    #[test]
    fn test_new_builds_aligned_roster() {
        let p = paper("2301.00001", "Test", &["Jane Doe", "Bob Lee"]);

        assert_eq!(p.authors, vec!["Jane Doe", "Bob Lee"]);
        assert_eq!(p.author_ids, vec!["doe_J", "lee_B"]);
        assert_eq!(p.author_index.get("doe_J").map(String::as_str), Some("Jane Doe"));
        assert_eq!(p.link(), "https://arxiv.org/abs/2301.00001");
    }

    #[test]
    fn test_colliding_ids_last_write_wins() {
        let p = paper("1", "T", &["John Smith", "Jane Smith"]);

        assert_eq!(p.author_ids, vec!["smith_J", "smith_J"]);
        assert_eq!(p.author_index.len(), 1);
        assert_eq!(p.author_index["smith_J"], "Jane Smith");
    }

    #[test]
    fn test_remove_author() {
        let mut p = paper("1", "T", &["Jane Doe", "Bob Lee", "Ann Wu"]);

        assert!(p.remove_author("lee_B"));
        assert!(!p.remove_author("lee_B"));
        assert_eq!(p.authors, vec!["Jane Doe", "Ann Wu"]);
        assert_eq!(p.author_ids, vec!["doe_J", "wu_A"]);
        assert!(!p.has_author("lee_B"));
    }

    #[test]
    fn test_reindex_fills_missing_keys() {
        let mut p = paper("1", "T", &["Jane Doe"]);
        p.author_index.clear();
        p.reindex();
        assert_eq!(p.author_index["doe_J"], "Jane Doe");
    }

    #[test]
    fn test_equality_by_identifier() {
        let a = paper("2301.00001", "One", &["Jane Doe"]);
        let b = paper("2301.00001", "Two", &["Bob Lee"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_ordering() {
        let mut papers = vec![
            paper("2302.00001", "T", &["A B"]),
            paper("2301.10000", "T", &["A B"]),
            paper("2301.00002", "T", &["A B"]),
            paper("1912.9999", "T", &["A B"]),
        ];
        papers.sort();
        let ids: Vec<&str> = papers.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["1912.9999", "2301.00002", "2301.10000", "2302.00001"]);

        assert!(paper("2301.1", "T", &["A B"]) > paper("2301.09", "T", &["A B"]));
        // Same numeric value, different spelling: still a total order
        assert!(paper("2301.1", "T", &["A B"]) < paper("2301.10", "T", &["A B"]));
    }

    #[test]
    fn test_non_numeric_ids_sort_after_numeric() {
        let two = paper("2", "T", &["A B"]);
        let ten = paper("10", "T", &["A B"]);
        let legacy = paper("1a", "T", &["A B"]);
        let other = paper("astro-ph", "T", &["A B"]);

        assert!(two < ten);
        assert!(ten < legacy);
        assert!(two < legacy);
        assert!(legacy < other);

        let mut papers = vec![other.clone(), legacy.clone(), ten.clone(), two.clone()];
        papers.sort();
        let ids: Vec<&str> = papers.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["2", "10", "1a", "astro-ph"]);
    }

    #[test]
    fn test_search_string() {
        let p = paper("2301.00001", "Dark Matter", &["Jane Doe"]);
        let s = p.search_string();
        assert!(s.contains("dark matter"));
        assert!(s.contains("doe_j"));
        assert!(s.contains("jane doe"));
        assert!(s.contains("2301.00001"));
        assert!(s.contains("an abstract."));
    }

    #[test]
    fn test_author_line() {
        assert_eq!(paper("1", "T", &["Jane Doe"]).author_line(), "Jane Doe");
        assert_eq!(
            paper("1", "T", &["Jane Doe", "Bob Lee"]).author_line(),
            "Jane Doe, & Bob Lee"
        );
        assert_eq!(
            paper("1", "T", &["Jane Doe", "Bob Lee", "Ann Wu"]).author_line(),
            "Jane Doe, Bob Lee, & Ann Wu"
        );
    }

    #[test]
    fn test_render_layout() {
        let p = paper("2301.00001", "Short Title", &["Jane Doe"]);
        let text = p.render(40);
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].chars().all(|c| c == '%'));
        assert_eq!(lines[0].len(), 40 + PAD_LEFT.len() + PAD_RIGHT.len());
        assert!(lines[2].contains("Short Title"));
        assert!(lines[4].contains("https://arxiv.org/abs/2301.00001"));
        assert!(lines[6].contains("Jane Doe"));
        for line in &lines {
            assert_eq!(display_width(line), lines[0].len());
        }
    }

    #[test]
    fn test_render_wraps_long_fields() {
        let title = "A very long title that will certainly not fit inside a narrow box";
        let p = paper("2301.00001", title, &["Jane Doe"]);
        let text = p.render(20);

        assert!(text.contains(CONTINUATION));
        let parsed = PaperRecord::parse_rendered(&text).unwrap();
        assert_eq!(parsed.title, title);
    }

    #[test]
    fn test_field_ending_in_mark_round_trips() {
        // short title, and one that fills the line exactly
        for title in ["Alpha\u{2010}", "abcdefghijklmnopqrs\u{2010}"] {
            let p = paper("2301.00001", title, &["Jane Doe"]);
            let text = p.render(20);
            let parsed = PaperRecord::parse_rendered(&text).unwrap();
            assert_eq!(parsed.title, title);
            assert_eq!(parsed.link, p.link());
            assert_eq!(parsed.authors, p.authors);
        }
    }

    #[test]
    fn test_render_round_trip() {
        let p = paper(
            "2301.00001",
            "Magnetorotational turbulence in stratified protoplanetary disks with dead zones",
            &["Jane Doe", "Bob Lee (MIT)", "Ann Wu"],
        );
        let parsed = PaperRecord::parse_rendered(&p.to_string()).unwrap();

        assert_eq!(parsed.title, p.title);
        assert_eq!(parsed.link, p.link());
        assert_eq!(parsed.authors, p.authors);
    }

    #[test]
    fn test_parse_rendered_errors() {
        assert!(matches!(
            PaperRecord::parse_rendered("no box here"),
            Err(RenderError::MissingBorder)
        ));

        let p = paper("1", "T", &["Jane Doe"]);
        let text = p.render(20);
        let cut: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        let truncated = format!("{}\n{}\n{}", cut[0], cut[1], cut[cut.len() - 1]);
        assert!(matches!(
            PaperRecord::parse_rendered(&truncated),
            Err(RenderError::Truncated)
        ));
    }

    #[test]
    fn test_serde_round_trip_keeps_roster() {
        let p = paper("2301.00001", "T", &["Jane Doe", "Bob Lee"]);
        let json = serde_json::to_string(&p).unwrap();
        let back: PaperRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.author_ids, p.author_ids);
        assert_eq!(back.author_index, p.author_index);
        assert_eq!(back.r#abstract, p.r#abstract);
    }
}

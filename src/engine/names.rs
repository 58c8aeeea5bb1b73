//! Author name normalization.

use tracing::debug;

/// A normalized author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorName {
    /// `surname_I`, e.g. `doe_J`
    pub canonical_id: String,
    /// Whitespace-joined name with the affiliation removed
    pub display_name: String,
    /// Set when the raw text could not be split into given name and surname
    pub ambiguous: bool,
}

/// Build a canonical id from a surname and a given name
pub fn canonical_id(surname: &str, given: &str) -> String {
    let initial: String = given
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    format!("{}_{}", surname.to_lowercase(), initial)
}

/// Normalize a raw author name as it appears in a listing.
///
/// - `"John A. Smith (MIT)"` -> `smith_J`, `"John A. Smith"`
/// - `"Jane Doe"` -> `doe_J`
/// - `"J.Smith"` -> `smith_J` (spacing lost in the feed)
///
/// Never fails. Empty input yields the id `"_"` and is flagged ambiguous.
pub fn normalize(raw: &str) -> AuthorName {
    let stripped = match raw.find('(') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let tokens: Vec<&str> = stripped.split_whitespace().collect();

    let (given, surname, ambiguous) = match tokens.as_slice() {
        [] => ("", "", true),
        [single] => {
            let pieces: Vec<&str> = single.split('.').filter(|p| !p.is_empty()).collect();
            match pieces.as_slice() {
                [] => ("", "", true),
                [only] => (*only, *only, true),
                [first, .., last] => (*first, *last, false),
            }
        }
        [first, .., last] => (*first, *last, false),
    };

    if ambiguous {
        debug!(raw = raw, "Ambiguous author name, using best-effort id");
    }

    AuthorName {
        canonical_id: canonical_id(surname, given),
        display_name: tokens.join(" "),
        ambiguous,
    }
}

/// Split a raw author block into individual raw names.
///
/// Names are separated by commas or line breaks. Commas inside an
/// affiliation's parentheses do not split.
pub fn split_author_block(block: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in block.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' | '\n' if depth == 0 => {
                names.push(&block[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    names.push(&block[start..]);

    names
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect()
}

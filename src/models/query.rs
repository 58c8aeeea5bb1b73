//! Watch-list query terms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First-name part of an author term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstName {
    /// Lower-cased given-name fragment that must appear in the paper's display name
    Fragment(String),
    /// No first name supplied; any id match is accepted but unverified
    Wildcard,
}

/// An author to look for, as `(surname, initial, first name)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorTerm {
    /// Lower-cased surname
    pub surname: String,
    /// Upper-cased first initial, `None` for wildcard terms
    pub initial: Option<char>,
    pub first_name: FirstName,
}

impl AuthorTerm {
    /// Term with a concrete first name
    pub fn new(surname: &str, first_name: &str) -> Self {
        let first = first_name.trim().trim_end_matches('.').to_lowercase();
        if first.is_empty() {
            return Self::wildcard(surname);
        }
        Self {
            surname: surname.trim().to_lowercase(),
            initial: first.chars().next().and_then(|c| c.to_uppercase().next()),
            first_name: FirstName::Fragment(first),
        }
    }

    /// Term that matches any first name
    pub fn wildcard(surname: &str) -> Self {
        Self {
            surname: surname.trim().to_lowercase(),
            initial: None,
            first_name: FirstName::Wildcard,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.first_name == FirstName::Wildcard
    }

    /// Canonical id this term resolves to, e.g. `smith_jones_A`.
    ///
    /// Hyphens in the surname become underscores. Wildcard terms have no
    /// single id.
    pub fn canonical_id(&self) -> Option<String> {
        self.initial
            .map(|i| format!("{}_{}", self.surname.replace('-', "_"), i))
    }
}

impl fmt::Display for AuthorTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.first_name {
            FirstName::Fragment(first) => write!(f, "{}, {}", self.surname, first),
            FirstName::Wildcard => write!(f, "{}, *", self.surname),
        }
    }
}

/// A single parsed query term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryTerm {
    /// Lower-cased substring searched in title, abstract, identifier and roster
    Keyword(String),
    /// Author matched against the roster's canonical ids
    Author(AuthorTerm),
}

impl QueryTerm {
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            QueryTerm::Keyword(k) => Some(k),
            QueryTerm::Author(_) => None,
        }
    }

    pub fn as_author(&self) -> Option<&AuthorTerm> {
        match self {
            QueryTerm::Author(a) => Some(a),
            QueryTerm::Keyword(_) => None,
        }
    }
}

impl fmt::Display for QueryTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryTerm::Keyword(k) => write!(f, "{}", k),
            QueryTerm::Author(a) => write!(f, "{}", a),
        }
    }
}

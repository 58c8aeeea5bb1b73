//! Listing page requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::FeedError;

/// Default number of entries requested per page
pub const DEFAULT_SHOW: usize = 200;

/// A month of a yearly listing, or the whole year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthSpec {
    Month(u32),
    All,
}

impl FromStr for MonthSpec {
    type Err = FeedError;

    /// Accepts `1`-`12`, English month names or abbreviations, and `all`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let month = match s.as_str() {
            "all" => return Ok(MonthSpec::All),
            "jan" | "january" => 1,
            "feb" | "february" => 2,
            "mar" | "march" => 3,
            "apr" | "april" => 4,
            "may" => 5,
            "jun" | "june" => 6,
            "jul" | "july" => 7,
            "aug" | "august" => 8,
            "sep" | "sept" | "september" => 9,
            "oct" | "october" => 10,
            "nov" | "november" => 11,
            "dec" | "december" => 12,
            other => other
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=12).contains(m))
                .ok_or_else(|| FeedError::InvalidRequest(format!("Unknown month: {}", other)))?,
        };
        Ok(MonthSpec::Month(month))
    }
}

impl fmt::Display for MonthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthSpec::Month(m) => write!(f, "{:02}", m),
            MonthSpec::All => write!(f, "all"),
        }
    }
}

/// Which page of a category's listing to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingMode {
    /// Today's new submissions
    New,
    /// The past week
    Recent { skip: usize, show: usize },
    /// A month (or year) of an archive; `year` is kept as two digits
    Month {
        year: u32,
        month: MonthSpec,
        show: usize,
    },
}

/// A listing page of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    pub category: String,
    pub mode: ListingMode,
}

impl ListingRequest {
    /// Today's new submissions in `category`
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            mode: ListingMode::New,
        }
    }

    pub fn recent(category: impl Into<String>, skip: usize, show: usize) -> Self {
        Self {
            category: category.into(),
            mode: ListingMode::Recent { skip, show },
        }
    }

    /// A monthly or yearly listing; only the last two digits of `year` are used
    pub fn month(category: impl Into<String>, year: u32, month: MonthSpec, show: usize) -> Self {
        Self {
            category: category.into(),
            mode: ListingMode::Month {
                year: year % 100,
                month,
                show,
            },
        }
    }

    /// Page URL relative to the listing server's `base`
    pub fn url(&self, base: &Url) -> Result<Url, FeedError> {
        let category = self.category.trim();
        if category.is_empty() || category.contains('/') {
            return Err(FeedError::InvalidRequest(format!(
                "Invalid category: {:?}",
                self.category
            )));
        }

        let url = match self.mode {
            ListingMode::New => base.join(&format!("list/{}/new", category))?,
            ListingMode::Recent { skip, show } => {
                let mut url = base.join(&format!("list/{}/pastweek", category))?;
                url.query_pairs_mut()
                    .append_pair("skip", &skip.to_string())
                    .append_pair("show", &show.to_string());
                url
            }
            ListingMode::Month { year, month, show } => {
                let period = match month {
                    MonthSpec::Month(m) => format!("{:02}{:02}", year, m),
                    MonthSpec::All => format!("{:02}", year),
                };
                let mut url = base.join(&format!("list/{}/{}", category, period))?;
                url.query_pairs_mut().append_pair("show", &show.to_string());
                url
            }
        };
        Ok(url)
    }
}

/// Abstract page of one paper, relative to the listing server's `base`.
///
/// Old-style identifiers such as `astro-ph/0601001` keep their slash.
pub fn abstract_url(base: &Url, identifier: &str) -> Result<Url, FeedError> {
    let identifier = identifier.trim();
    if identifier.is_empty()
        || identifier.contains(char::is_whitespace)
        || identifier.split('/').any(|part| part.is_empty() || part == "..")
    {
        return Err(FeedError::InvalidRequest(format!(
            "Invalid paper identifier: {:?}",
            identifier
        )));
    }
    Ok(base.join(&format!("abs/{}", identifier))?)
}

//! Lookup query and batch summary models.

use serde::{Deserialize, Serialize};

use crate::utils::normalize;

/// How the author part of a lookup query is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorQuery {
    /// Send the author field exactly as written in the file
    #[default]
    Raw,
    /// Send the normalized title and the authors' last names
    LastNames,
}

/// Title/author pair sent to a DOI resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub title: String,
    pub author: String,
}

impl Query {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Query built from the normalized title and a list of last names
    pub fn normalized(title: &str, last_names: &[String]) -> Self {
        Self {
            title: normalize(title),
            author: last_names.join(" "),
        }
    }
}

/// Counts collected over one batch pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichSummary {
    /// Number of entries in the bibliography
    pub total: usize,

    /// Entries that already had a DOI before the pass
    pub before: usize,

    /// Entries that received a DOI during the pass
    pub new: usize,

    /// Entries whose lookup failed
    pub failed: usize,

    /// Entries skipped for lack of a title or author; not part of the
    /// before/new counts
    pub skipped: usize,
}

impl EnrichSummary {
    /// Entries carrying a DOI after the pass
    pub fn after(&self) -> usize {
        self.before + self.new
    }
}

impl std::fmt::Display for EnrichSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "We added {} DOIs !", self.new)?;
        writeln!(f, "Before: {}/{} entries had DOI", self.before, self.total)?;
        write!(f, "Now: {}/{} entries have DOI", self.after(), self.total)
    }
}

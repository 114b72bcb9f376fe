//! Core data models for bibliographies and DOI lookups.

mod entry;
mod query;

pub use entry::{Bibliography, Delimiter, Entry, EntryError, Field};
pub use query::{AuthorQuery, EnrichSummary, Query};

//! # doi-fill
//!
//! Fill in missing DOI fields of a BibTeX bibliography by searching the
//! CrossRef metadata registry with each entry's title and author.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Bibliography, Entry, Query, EnrichSummary)
//! - [`bib`]: Reading and writing `.bib` files
//! - [`sources`]: DOI resolvers behind the [`DoiResolver`] trait (CrossRef, mocks)
//! - [`enrich`]: The batch pass that resolves every entry lacking a DOI
//! - [`utils`]: HTTP transport, retry, text normalization, and progress output
//! - [`config`]: Configuration management

pub mod bib;
pub mod config;
pub mod enrich;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use enrich::{enrich, EnrichOptions};
pub use models::{Bibliography, EnrichSummary, Entry, Query};
pub use sources::{CrossRefResolver, DoiResolver, LookupError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

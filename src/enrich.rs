//! The batch pass: resolve every entry that lacks a DOI.

use std::path::Path;

use crate::bib::{read_bibliography, write_bibliography, BibError};
use crate::models::{AuthorQuery, Bibliography, EnrichSummary};
use crate::sources::{DoiResolver, LookupError};
use crate::utils::ProgressReporter;

/// Settings for one batch pass
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// How the author part of each query is built
    pub author_query: AuthorQuery,

    /// Print the in-place progress line to stdout
    pub show_progress: bool,

    /// Field indentation of the written file
    pub indent: String,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            author_query: AuthorQuery::Raw,
            show_progress: false,
            indent: "    ".to_string(),
        }
    }
}

/// Errors that stop a whole run
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error(transparent)]
    Bib(#[from] BibError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Resolve missing DOIs in place, one entry at a time, in file order.
///
/// Entries with a non-blank DOI count as `before`. Entries without a title
/// or author are skipped and left out of both `before` and `new`. Failed
/// lookups leave the entry untouched. Transport errors abort the pass.
pub async fn enrich(
    bibliography: &mut Bibliography,
    resolver: &dyn DoiResolver,
    options: &EnrichOptions,
) -> Result<EnrichSummary, LookupError> {
    let total = bibliography.len();
    let mut summary = EnrichSummary {
        total,
        ..EnrichSummary::default()
    };

    let progress = if options.show_progress {
        ProgressReporter::new(total)
    } else {
        ProgressReporter::quiet(total)
    };

    for (i, entry) in bibliography.iter_mut().enumerate() {
        progress.set(i);

        if entry.has_doi() {
            summary.before += 1;
            continue;
        }

        let query = match entry.lookup_query(options.author_query) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!("Some issue with entry {}: {}", entry.key, e);
                summary.skipped += 1;
                continue;
            }
        };

        match resolver.lookup(&query).await {
            Ok(doi) => {
                tracing::debug!("{}: found DOI {} via {}", entry.key, doi, resolver.name());
                entry.set("doi", doi);
                summary.new += 1;
            }
            Err(e) if e.is_fatal() => {
                progress.finish();
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Unable to find DOI for {}: {}", query.title, e);
                summary.failed += 1;
            }
        }
    }

    progress.set(total);
    progress.finish();

    if summary.skipped > 0 {
        tracing::info!(
            "{} entries were skipped for lack of a title or author and are not counted",
            summary.skipped
        );
    }

    Ok(summary)
}

/// Read `input`, resolve missing DOIs, and write the result to `output`.
///
/// Nothing is written unless the whole pass completes.
pub async fn enrich_file(
    input: &Path,
    output: &Path,
    resolver: &dyn DoiResolver,
    options: &EnrichOptions,
) -> Result<EnrichSummary, EnrichError> {
    let mut bibliography = read_bibliography(input)?;
    let summary = enrich(&mut bibliography, resolver, options).await?;
    write_bibliography(&bibliography, output, &options.indent)?;
    Ok(summary)
}

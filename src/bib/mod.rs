//! Reading and writing `.bib` files.
//!
//! Parsing is delegated to the low-level [`biblatex::RawBibliography`]
//! parser. Field values are taken from the source text exactly as written,
//! between their delimiters, so nothing but a filled-in DOI changes on a
//! round trip. `@string` macros are kept unexpanded and repeated citation
//! keys are allowed. Writing renders the model back with a configurable
//! field indentation.

mod writer;

pub use writer::{render_bibliography, render_entry};

use biblatex::{RawBibliography, RawChunk, Spanned};
use std::path::{Path, PathBuf};

use crate::models::{Bibliography, Delimiter, Entry, Field};

/// Errors raised while reading or writing a bibliography file
#[derive(Debug, thiserror::Error)]
pub enum BibError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse bibliography: {0}")]
    Parse(String),
}

/// Parse BibTeX source into the crate's model.
pub fn parse_bibliography(src: &str) -> Result<Bibliography, BibError> {
    let raw = RawBibliography::parse(src).map_err(|e| BibError::Parse(e.to_string()))?;

    let mut bibliography: Bibliography = raw
        .entries
        .iter()
        .map(|entry| convert_entry(src, &entry.v))
        .collect();

    if !raw.preamble.is_empty() {
        bibliography.set_preamble(raw.preamble.as_str());
    }
    for definition in &raw.abbreviations {
        bibliography.push_string(convert_pair(src, definition));
    }

    Ok(bibliography)
}

/// Read and parse a `.bib` file.
pub fn read_bibliography(path: &Path) -> Result<Bibliography, BibError> {
    let src = std::fs::read_to_string(path).map_err(|source| BibError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let bibliography = parse_bibliography(&src)?;
    tracing::debug!(
        "Parsed {} entries from {}",
        bibliography.len(),
        path.display()
    );
    Ok(bibliography)
}

/// Render and write a bibliography to `path`.
pub fn write_bibliography(
    bibliography: &Bibliography,
    path: &Path,
    indent: &str,
) -> Result<(), BibError> {
    std::fs::write(path, render_bibliography(bibliography, indent)).map_err(|source| {
        BibError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Output path: `suffix` appended to the full input file name, so
/// `refs.bib` becomes `refs.bib_doi.bib`.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn convert_entry(src: &str, entry: &biblatex::RawEntry<'_>) -> Entry {
    entry.fields.iter().fold(
        Entry::new(entry.kind.v, entry.key.v),
        |mut acc, pair| {
            acc.push_field(convert_pair(src, pair));
            acc
        },
    )
}

fn convert_pair(src: &str, pair: &biblatex::Pair<'_>) -> Field {
    let (value, delimiter) = raw_value(src, &pair.value);
    Field::with_delimiter(pair.key.v, value, delimiter)
}

/// Source text of a field value and the delimiter it was written with.
///
/// A single braced or quoted chunk yields its inner text. Anything else
/// (numbers, macros, `#` concatenations) is kept as the whole expression.
fn raw_value(src: &str, value: &Spanned<biblatex::Field<'_>>) -> (String, Delimiter) {
    // the value span runs up to the next comma and may end in whitespace
    let expression = src.get(value.span.clone()).unwrap_or_default().trim_end();

    match value.v.as_slice() {
        [chunk] => match &chunk.v {
            RawChunk::Normal(text) if expression.starts_with('{') => {
                (text.to_string(), Delimiter::Braces)
            }
            RawChunk::Normal(text) if expression.starts_with('"') => {
                (text.to_string(), Delimiter::Quotes)
            }
            _ => (expression.to_string(), Delimiter::Bare),
        },
        _ => (expression.to_string(), Delimiter::Bare),
    }
}

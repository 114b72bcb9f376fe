//! Bibliography and entry models.

use crate::models::{AuthorQuery, Query};
use crate::utils::last_names;

/// How a field value is delimited in BibTeX source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// `{value}`
    #[default]
    Braces,
    /// `"value"`
    Quotes,
    /// Numbers, `@string` macros and `#` concatenations, written as-is
    Bare,
}

impl Delimiter {
    /// Wrap `value` in this delimiter
    pub fn wrap(self, value: &str) -> String {
        match self {
            Delimiter::Braces => format!("{{{}}}", value),
            Delimiter::Quotes => format!("\"{}\"", value),
            Delimiter::Bare => value.to_string(),
        }
    }
}

/// A single `name = value` pair of an entry.
///
/// `value` holds the raw BibTeX text found between the outer delimiters,
/// so LaTeX markup such as `{\"u}`, `--` or `$\alpha$` is kept verbatim.
/// For [`Delimiter::Bare`] it is the whole value expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name as written
    pub name: String,
    pub value: String,
    pub delimiter: Delimiter,
}

impl Field {
    /// A braced field
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_delimiter(name, value, Delimiter::Braces)
    }

    pub fn with_delimiter(
        name: impl Into<String>,
        value: impl Into<String>,
        delimiter: Delimiter,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            delimiter,
        }
    }

    /// `name = value` with the value in its delimiters
    pub fn to_bibtex(&self) -> String {
        format!("{} = {}", self.name, self.delimiter.wrap(&self.value))
    }
}

/// One bibliographic record (e.g. one paper).
///
/// Fields keep the order in which they appeared in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Citation key, e.g. `knuth1984`
    pub key: String,

    /// Entry type as written, e.g. `article`
    pub entry_type: String,

    fields: Vec<Field>,
}

impl Entry {
    /// Create an entry without fields
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style variant of [`Entry::set`]
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// All fields in source order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Append a field as-is, even when one with the same name exists
    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Look up a field by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.as_str())
    }

    /// Set a field, keeping its position, name and quoting if it already
    /// exists and appending a braced field otherwise.
    ///
    /// A bare value (a macro or concatenation) becomes braced text.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(name))
        {
            Some(field) => {
                field.value = value;
                if field.delimiter == Delimiter::Bare {
                    field.delimiter = Delimiter::Braces;
                }
            }
            None => self.fields.push(Field::new(name.to_lowercase(), value)),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.get("author")
    }

    /// The DOI, or `None` when the field is absent, empty or blank
    pub fn doi(&self) -> Option<&str> {
        self.get("doi").filter(|doi| !doi.trim().is_empty())
    }

    pub fn has_doi(&self) -> bool {
        self.doi().is_some()
    }

    /// Last names of the authors, falling back to the editors.
    pub fn author_last_names(&self) -> Result<Vec<String>, EntryError> {
        let raw = self
            .author()
            .or_else(|| self.get("editor"))
            .ok_or(EntryError::MissingField("author"))?;
        Ok(last_names(raw))
    }

    /// Build a lookup query from the raw title and author fields.
    pub fn query(&self) -> Result<Query, EntryError> {
        let title = self.title().ok_or(EntryError::MissingField("title"))?;
        let author = self.author().ok_or(EntryError::MissingField("author"))?;
        Ok(Query::new(title, author))
    }

    /// Build the query for the given author mode.
    ///
    /// [`AuthorQuery::Raw`] behaves like [`Entry::query`].
    /// [`AuthorQuery::LastNames`] normalizes the title and replaces the
    /// author field with last names, accepting editors as well.
    pub fn lookup_query(&self, mode: AuthorQuery) -> Result<Query, EntryError> {
        match mode {
            AuthorQuery::Raw => self.query(),
            AuthorQuery::LastNames => {
                let title = self.title().ok_or(EntryError::MissingField("title"))?;
                Ok(Query::normalized(title, &self.author_last_names()?))
            }
        }
    }
}

/// Ordered collection of entries loaded from one file, along with the
/// file's `@preamble` and `@string` definitions.
///
/// Citation keys are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    preamble: Option<String>,
    strings: Vec<Field>,
    entries: Vec<Entry>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw `@preamble` content, delimiters included
    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    pub fn set_preamble(&mut self, preamble: impl Into<String>) {
        self.preamble = Some(preamble.into());
    }

    /// `@string` macro definitions in source order
    pub fn strings(&self) -> &[Field] {
        &self.strings
    }

    pub fn push_string(&mut self, definition: Field) {
        self.strings.push(definition);
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry> {
        self.entries.iter_mut()
    }

    /// Find the first entry with a citation key
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

impl FromIterator<Entry> for Bibliography {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// Errors raised while reading an entry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    /// A field required for the lookup is not present
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

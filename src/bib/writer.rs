//! BibTeX serialization.

use crate::models::{Bibliography, Entry};

/// Render the preamble, every `@string` definition and every entry,
/// separated by blank lines.
pub fn render_bibliography(bibliography: &Bibliography, indent: &str) -> String {
    let preamble = bibliography
        .preamble()
        .map(|preamble| format!("@preamble{{{}}}\n", preamble));
    let strings = bibliography
        .strings()
        .iter()
        .map(|definition| format!("@string{{{}}}\n", definition.to_bibtex()));
    let entries = bibliography
        .iter()
        .map(|entry| render_entry(entry, indent));

    preamble
        .into_iter()
        .chain(strings)
        .chain(entries)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one entry as `@type{key,` followed by one indented
/// `name = value` line per field, in field order.
pub fn render_entry(entry: &Entry, indent: &str) -> String {
    let mut out = format!("@{}{{{}", entry.entry_type, entry.key);

    for field in entry.fields() {
        out.push_str(",\n");
        out.push_str(indent);
        out.push_str(&field.to_bibtex());
    }

    out.push_str("\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Delimiter, Field};

    #[test]
    fn test_render_entry_with_indent() {
        let entry = Entry::new("article", "knuth1984")
            .with_field("title", "Literate {Programming}")
            .with_field("year", "1984");

        assert_eq!(
            render_entry(&entry, "    "),
            "@article{knuth1984,\n    title = {Literate {Programming}},\n    year = {1984}\n}\n"
        );
    }

    #[test]
    fn test_render_entry_without_fields() {
        let entry = Entry::new("misc", "empty");
        assert_eq!(render_entry(&entry, "    "), "@misc{empty\n}\n");
    }

    #[test]
    fn test_render_bibliography_separates_entries() {
        let bib: Bibliography = vec![
            Entry::new("misc", "a").with_field("note", "x"),
            Entry::new("misc", "b").with_field("note", "y"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            render_bibliography(&bib, "\t"),
            "@misc{a,\n\tnote = {x}\n}\n\n@misc{b,\n\tnote = {y}\n}\n"
        );
    }

    #[test]
    fn test_render_keeps_delimiters() {
        let mut entry = Entry::new("conference", "c");
        entry.push_field(Field::with_delimiter("Month", "jan", Delimiter::Bare));
        entry.push_field(Field::with_delimiter("note", "q", Delimiter::Quotes));

        assert_eq!(
            render_entry(&entry, "  "),
            "@conference{c,\n  Month = jan,\n  note = \"q\"\n}\n"
        );
    }

    #[test]
    fn test_render_preamble_and_strings_first() {
        let mut bib: Bibliography = vec![Entry::new("misc", "a").with_field("publisher", "x")]
            .into_iter()
            .collect();
        bib.set_preamble("\"\\newcommand{\\x}{y}\"");
        bib.push_string(Field::with_delimiter("acm", "ACM", Delimiter::Quotes));

        assert_eq!(
            render_bibliography(&bib, "    "),
            "@preamble{\"\\newcommand{\\x}{y}\"}\n\n@string{acm = \"ACM\"}\n\n@misc{a,\n    publisher = {x}\n}\n"
        );
    }

    #[test]
    fn test_render_empty_bibliography() {
        assert_eq!(render_bibliography(&Bibliography::new(), "    "), "");
    }
}

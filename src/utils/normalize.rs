//! Turning LaTeX-flavoured bibliography text into plain search terms.

use regex::Regex;
use std::sync::OnceLock;

static LATEX_CHARS: OnceLock<Regex> = OnceLock::new();
static INLINE_MATH: OnceLock<Regex> = OnceLock::new();
static AUTHOR_SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn latex_chars() -> &'static Regex {
    LATEX_CHARS.get_or_init(|| Regex::new(r#"[{}\\'"^]"#).expect("valid regex"))
}

fn inline_math() -> &'static Regex {
    INLINE_MATH.get_or_init(|| Regex::new(r"\$.*?\$").expect("valid regex"))
}

fn author_separator() -> &'static Regex {
    AUTHOR_SEPARATOR.get_or_init(|| Regex::new(r"\band\b").expect("valid regex"))
}

/// Normalize a raw field value to plain ASCII without LaTeX markup.
///
/// Order matters: braces, backslashes, quotes and carets go first, then
/// every `$...$` span (shortest match), then the rest is transliterated.
///
/// ```
/// use doi_fill::utils::normalize;
///
/// assert_eq!(normalize(r#"G{\"o}del's $\omega$-Theorem"#), "Godels -Theorem");
/// ```
pub fn normalize(raw: &str) -> String {
    let stripped = latex_chars().replace_all(raw, "");
    let without_math = inline_math().replace_all(&stripped, "");
    deunicode::deunicode(&without_math)
}

/// Split an author or editor field into last names.
///
/// Authors are separated by the word `and`. Each name is reduced to the
/// part before the first comma (`Last, First`), else to its final word
/// (`First Last`), else kept whole. Empty pieces are dropped.
pub fn last_names(raw: &str) -> Vec<String> {
    let normalized = normalize(raw);
    author_separator()
        .split(&normalized)
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(last_name)
        .collect()
}

fn last_name(author: &str) -> String {
    if let Some((last, _)) = author.split_once(',') {
        last.trim_end().to_string()
    } else if author.contains(char::is_whitespace) {
        author
            .split_whitespace()
            .last()
            .unwrap_or(author)
            .to_string()
    } else {
        author.to_string()
    }
}

//! The fixed placeholder vocabulary recognised in step expressions.

/// Translate a placeholder name into its regular-expression replacement.
///
/// The replacement includes the capturing group (and, for `{string}`, the
/// surrounding quotes), so callers splice it into the expression verbatim.
/// Returns `None` for names outside the vocabulary.
///
/// # Examples
/// ```
/// use gherkin_runner_patterns::placeholder_pattern;
/// assert_eq!(placeholder_pattern("int"), Some(r"(-?\d+)"));
/// assert_eq!(placeholder_pattern("colour"), None);
/// ```
#[must_use]
pub fn placeholder_pattern(name: &str) -> Option<&'static str> {
    match name {
        // Quoted text with backslash escapes honoured; the quotes stay
        // outside the capture group.
        "string" => Some(r#""((?:[^"\\]|\\.)*)""#),
        "int" => Some(r"(-?\d+)"),
        "float" => Some(r"(-?\d+\.\d+)"),
        "word" => Some(r"(\w+)"),
        _ => None,
    }
}

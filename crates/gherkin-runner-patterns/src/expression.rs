//! Conversion of step expressions into anchored regular-expression sources.

use regex::Regex;

use crate::errors::PatternError;
use crate::vocab::placeholder_pattern;

/// Expand the placeholder vocabulary in `expr` and anchor the result.
///
/// Everything outside a placeholder passes through as regular-expression
/// source, so expressions may mix placeholders with hand-written regex
/// fragments. Three brace forms are distinguished:
///
/// - `{string}`, `{int}`, `{float}`, `{word}` become their capturing groups;
/// - `{2}`, `{1,3}` and friends are left verbatim as repetition quantifiers;
/// - any other `{name}` is escaped so the step text must contain it
///   literally.
///
/// A backslash escapes the following character, leaving it untouched.
///
/// # Examples
/// ```
/// use gherkin_runner_patterns::build_regex_from_expression;
/// assert_eq!(build_regex_from_expression("I add {int}"), r"^I add (-?\d+)$");
/// ```
#[must_use]
pub fn build_regex_from_expression(expr: &str) -> String {
    let mut source = String::with_capacity(expr.len() + 2);
    source.push('^');
    let mut pos = 0;

    while let Some(c) = expr.get(pos..).and_then(|rest| rest.chars().next()) {
        match c {
            '\\' => {
                source.push('\\');
                pos += 1;
                if let Some(next) = expr.get(pos..).and_then(|rest| rest.chars().next()) {
                    source.push(next);
                    pos += next.len_utf8();
                }
            }
            '{' => match read_braced(expr, pos) {
                Some((body, next_pos)) => {
                    source.push_str(&substitute(body));
                    pos = next_pos;
                }
                None => {
                    // Unterminated brace: escape it so the regex still
                    // compiles and matches the raw character.
                    source.push_str(r"\{");
                    pos += 1;
                }
            },
            _ => {
                source.push(c);
                pos += c.len_utf8();
            }
        }
    }

    source.push('$');
    source
}

/// Compile a step expression into an anchored [`Regex`].
///
/// # Errors
/// Returns [`PatternError`] when the expression's regex fragments fail to
/// compile; the vocabulary itself always expands cleanly.
pub fn compile_expression(expr: &str) -> Result<Regex, PatternError> {
    let source = build_regex_from_expression(expr);
    Regex::new(&source).map_err(|source| PatternError {
        expression: expr.to_string(),
        source,
    })
}

/// Return the text between the brace at `open` and its closing brace, along
/// with the position just past the closing brace.
fn read_braced(expr: &str, open: usize) -> Option<(&str, usize)> {
    let rest = expr.get(open + 1..)?;
    let close = rest.find('}')?;
    Some((rest.get(..close)?, open + close + 2))
}

fn substitute(body: &str) -> String {
    if let Some(replacement) = placeholder_pattern(body) {
        return replacement.to_string();
    }
    if is_repetition(body) {
        return format!("{{{body}}}");
    }
    // Unknown placeholder: match the braced text literally rather than
    // letting the regex engine reject it as a malformed quantifier.
    regex::escape(&format!("{{{body}}}"))
}

/// Repetition quantifier bodies (`2`, `1,`, `1,3`) pass through verbatim.
fn is_repetition(body: &str) -> bool {
    let (lower, upper) = match body.split_once(',') {
        Some((lo, hi)) => (lo, Some(hi)),
        None => (body, None),
    };
    let is_count = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    !lower.is_empty()
        && is_count(lower)
        && upper.is_none_or(|hi| hi.is_empty() || is_count(hi))
}

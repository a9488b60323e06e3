//! Capture extraction shared by the registry and its tests.

use regex::Regex;

/// Return the capture groups when `text` matches `re`, or `None` otherwise.
///
/// Group 0 (the full match) is excluded so only the pattern's own groups
/// contribute; groups that did not participate in the match yield empty
/// strings to keep positional alignment.
///
/// # Examples
/// ```
/// use gherkin_runner_patterns::{compile_expression, extract_captured_values};
/// let regex = compile_expression("I add {int} and {int}")
///     .expect("vocabulary expression compiles");
/// assert_eq!(
///     extract_captured_values(&regex, "I add 2 and -3"),
///     Some(vec!["2".to_string(), "-3".to_string()]),
/// );
/// assert_eq!(extract_captured_values(&regex, "I add two"), None);
/// ```
#[must_use]
pub fn extract_captured_values(re: &Regex, text: &str) -> Option<Vec<String>> {
    let caps = re.captures(text)?;
    Some(
        caps.iter()
            .skip(1)
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect(),
    )
}

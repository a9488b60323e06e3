//! Error type surfaced while compiling step expressions.

use thiserror::Error;

/// Error raised when a step expression cannot be compiled into a regular
/// expression.
///
/// The expression text is retained so registration failures can be attributed
/// to the offending definition.
///
/// # Examples
/// ```
/// use gherkin_runner_patterns::compile_expression;
/// let err = compile_expression(r"broken (").expect_err("unbalanced group");
/// assert!(err.to_string().contains("broken ("));
/// ```
#[derive(Debug, Error)]
#[error("failed to compile step expression `{expression}`: {source}")]
pub struct PatternError {
    /// The expression text as supplied at registration.
    pub expression: String,
    /// The underlying regex compilation failure.
    #[source]
    pub source: regex::Error,
}

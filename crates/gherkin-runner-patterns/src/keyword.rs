//! Shared step keyword type and parsing utilities.

use std::fmt;
use std::str::FromStr;

/// Keyword class attached to a parsed step or a registered definition.
///
/// `Any` corresponds to the `*` token, which feature documents may use in
/// place of a named keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Setup preconditions for a scenario.
    Given,
    /// Perform the action under test.
    When,
    /// Assert the expected outcome.
    Then,
    /// Additional conditions continuing the previous step.
    And,
    /// Negative or contrasting conditions.
    But,
    /// The `*` wildcard keyword.
    Any,
}

impl StepKeyword {
    /// Return the keyword as its canonical document token.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_runner_patterns::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Given.as_str(), "Given");
    /// assert_eq!(StepKeyword::Any.as_str(), "*");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
            Self::Any => "*",
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`StepKeyword`] from a string fails.
///
/// Carries the unrecognised token for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepKeywordParseError(pub String);

impl fmt::Display for StepKeywordParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid step keyword: {}", self.0)
    }
}

impl std::error::Error for StepKeywordParseError {}

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed == "*" {
            Ok(Self::Any)
        } else if trimmed.eq_ignore_ascii_case("given") {
            Ok(Self::Given)
        } else if trimmed.eq_ignore_ascii_case("when") {
            Ok(Self::When)
        } else if trimmed.eq_ignore_ascii_case("then") {
            Ok(Self::Then)
        } else if trimmed.eq_ignore_ascii_case("and") {
            Ok(Self::And)
        } else if trimmed.eq_ignore_ascii_case("but") {
            Ok(Self::But)
        } else {
            Err(StepKeywordParseError(trimmed.to_string()))
        }
    }
}

impl TryFrom<&str> for StepKeyword {
    type Error = StepKeywordParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::{StepKeyword, StepKeywordParseError};
    use rstest::rstest;

    #[rstest]
    #[case("Given", StepKeyword::Given)]
    #[case("given", StepKeyword::Given)]
    #[case(" WhEn ", StepKeyword::When)]
    #[case("THEN", StepKeyword::Then)]
    #[case("And", StepKeyword::And)]
    #[case(" but ", StepKeyword::But)]
    #[case("*", StepKeyword::Any)]
    fn parses_document_tokens(#[case] input: &str, #[case] expected: StepKeyword) {
        assert_eq!(input.parse::<StepKeyword>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(
            "Whenever".parse::<StepKeyword>(),
            Err(StepKeywordParseError("Whenever".to_string()))
        );
    }

    #[test]
    fn round_trips_named_keywords() {
        for keyword in [
            StepKeyword::Given,
            StepKeyword::When,
            StepKeyword::Then,
            StepKeyword::And,
            StepKeyword::But,
            StepKeyword::Any,
        ] {
            assert_eq!(keyword.as_str().parse::<StepKeyword>(), Ok(keyword));
        }
    }
}

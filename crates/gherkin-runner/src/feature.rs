//! Parsed feature-document model.
//!
//! These types are produced by [`crate::parser::parse`] and consumed by the
//! execution engine. They are plain data: once the parser returns, nothing
//! mutates them.

use gherkin_runner_patterns::StepKeyword;

/// A rectangular grid of string cells attached to a step.
pub type DataTable = Vec<Vec<String>>;

/// A single parsed step line, with any trailing data table or doc-string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The raw keyword token as written in the document.
    pub keyword: String,
    /// The normalised keyword class.
    pub kind: StepKeyword,
    /// The step's matchable sentence.
    pub text: String,
    /// Data table rows attached to this step, outermost rows first.
    pub table: Option<DataTable>,
    /// Doc-string content attached to this step, fence lines excluded.
    pub docstring: Option<String>,
}

/// A concrete scenario: either written directly or synthesised from a
/// scenario outline during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Scenario name; outline-derived scenarios carry an `(Example N)` suffix.
    pub name: String,
    /// Steps in document order.
    pub steps: Vec<Step>,
    /// Tags from `@tag` lines preceding the header. Parsed, never enforced.
    pub tags: Vec<String>,
}

/// A fully materialised feature document with all outlines expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feature {
    /// The `Feature:` header text.
    pub name: String,
    /// Free-text body between the header and the first structural line.
    pub description: String,
    /// Background steps; empty when the document has no `Background:` block.
    pub background: Vec<Step>,
    /// Scenarios in parse order, outline expansions included at the point
    /// their example table closed.
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Locate a scenario by exact name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_runner::parser::parse;
    ///
    /// let feature = parse("Feature: F\nScenario: S\nGiven a step");
    /// assert!(feature.scenario("S").is_some());
    /// assert!(feature.scenario("missing").is_none());
    /// ```
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.name == name)
    }
}

//! Line-oriented feature-document parser.
//!
//! The parser makes a single forward scan over the document, classifying each
//! line and maintaining a small explicit state set: the active step context
//! (background, outline template, or current scenario), an open doc-string
//! buffer, and an open example-table accumulator. Scenario outlines are
//! expanded into concrete scenarios at the point their example table closes,
//! so the returned [`Feature`] never contains outline templates.
//!
//! Parsing is best-effort by design: malformed constructs (orphan table rows,
//! doc-strings with no preceding step, outline templates without examples)
//! are dropped with a debug log entry rather than raised as errors.

use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use gherkin_runner_patterns::StepKeyword;
use regex::Regex;
use thiserror::Error;

use crate::feature::{Feature, Scenario, Step};

const LOG_TARGET: &str = "gherkin_runner::parser";
const DOCSTRING_FENCE: &str = "\"\"\"";

static STEP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*|Given|When|Then|And|But)\s+(.+)$")
        .unwrap_or_else(|err| panic!("step line regex must compile: {err}"))
});

/// Error returned by [`parse_file`] when the document cannot be read.
///
/// Parsing itself never fails; only the I/O layer does.
#[derive(Debug, Error)]
#[error("failed to read feature document {path}: {source}")]
pub struct ParseFileError {
    /// Path of the document that could not be read.
    pub path: Utf8PathBuf,
    /// The underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

/// Parse a feature document into a fully materialised [`Feature`].
///
/// Always returns a best-effort document; anomalies are logged and skipped.
///
/// # Examples
///
/// ```
/// use gherkin_runner::parser::parse;
///
/// let feature = parse("Feature: F\nScenario: S\nGiven a\nWhen b\nThen c");
/// assert_eq!(feature.name, "F");
/// assert_eq!(feature.scenarios.len(), 1);
/// assert_eq!(feature.scenarios[0].steps.len(), 3);
/// ```
#[must_use]
pub fn parse(text: &str) -> Feature {
    let mut builder = DocumentBuilder::default();
    for line in text.lines() {
        builder.consume(line);
    }
    builder.finish()
}

/// Read and parse a feature document from disk.
///
/// # Errors
///
/// Returns [`ParseFileError`] when the file cannot be read.
pub fn parse_file(path: &Utf8Path) -> Result<Feature, ParseFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseFileError {
        path: path.to_owned(),
        source,
    })?;
    Ok(parse(&text))
}

/// Transient example-table accumulator consumed by outline expansion.
#[derive(Debug, Default)]
struct ExampleTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Default)]
struct DocumentBuilder {
    name: String,
    description: Vec<String>,
    background: Vec<Step>,
    scenarios: Vec<Scenario>,
    current: Option<Scenario>,
    outline: Option<Scenario>,
    examples: Option<ExampleTable>,
    docstring: Option<Vec<String>>,
    pending_tags: Vec<String>,
    in_background: bool,
    in_outline: bool,
    body_started: bool,
}

impl DocumentBuilder {
    fn consume(&mut self, line: &str) {
        let trimmed = line.trim();

        // Doc-string handling wins over every other classification: content
        // between the fences is captured verbatim, even lines that would
        // otherwise read as comments or headers.
        if self.docstring.is_some() || trimmed.starts_with(DOCSTRING_FENCE) {
            self.consume_docstring(line, trimmed);
            return;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }
        // Any non-table line closes an open example table and expands the
        // outline it belongs to. Blank lines and comments (above) do not.
        if !trimmed.starts_with('|') {
            self.close_examples();
        }

        if let Some(rest) = trimmed.strip_prefix("Feature:") {
            self.name = rest.trim().to_string();
            return;
        }
        if trimmed.strip_prefix("Background:").is_some() {
            self.start_background();
            return;
        }
        if let Some(rest) = trimmed.strip_prefix("Scenario Outline:") {
            self.start_scenario(rest, true);
            return;
        }
        if let Some(rest) = trimmed.strip_prefix("Scenario:") {
            self.start_scenario(rest, false);
            return;
        }
        if trimmed.strip_prefix("Examples:").is_some() {
            self.examples = Some(ExampleTable::default());
            self.body_started = true;
            return;
        }
        if trimmed.starts_with('|') {
            self.consume_table_row(trimmed);
            return;
        }
        if trimmed.starts_with('@') {
            self.consume_tag_line(trimmed);
            return;
        }
        if let Some(step) = parse_step_line(trimmed) {
            self.push_step(step);
            return;
        }
        self.consume_free_text(trimmed);
    }

    fn consume_docstring(&mut self, line: &str, trimmed: &str) {
        match self.docstring.as_mut() {
            None => {
                self.docstring = Some(Vec::new());
            }
            Some(buffer) => {
                if trimmed.starts_with(DOCSTRING_FENCE) {
                    let content = buffer.join("\n");
                    self.docstring = None;
                    match self.active_steps_mut().and_then(|steps| steps.last_mut()) {
                        Some(step) => step.docstring = Some(content),
                        None => log::debug!(
                            target: LOG_TARGET,
                            "dropping doc-string with no preceding step"
                        ),
                    }
                } else {
                    buffer.push(line.to_string());
                }
            }
        }
    }

    fn start_background(&mut self) {
        self.commit_current();
        self.in_background = true;
        self.in_outline = false;
        self.body_started = true;
    }

    fn start_scenario(&mut self, name: &str, is_outline: bool) {
        self.commit_current();
        self.in_background = false;
        self.in_outline = is_outline;
        self.body_started = true;
        let scenario = Scenario {
            name: name.trim().to_string(),
            steps: Vec::new(),
            tags: std::mem::take(&mut self.pending_tags),
        };
        let dropped = if is_outline {
            self.current = None;
            self.outline.replace(scenario)
        } else {
            self.current = Some(scenario);
            self.outline.take()
        };
        if let Some(template) = dropped {
            log::debug!(
                target: LOG_TARGET,
                "discarding outline template {:?}: no examples table opened",
                template.name
            );
        }
    }

    fn consume_table_row(&mut self, trimmed: &str) {
        let cells = parse_table_cells(trimmed);
        if let Some(examples) = self.examples.as_mut() {
            if examples.headers.is_empty() {
                examples.headers = cells;
            } else {
                if cells.len() != examples.headers.len() {
                    log::debug!(
                        target: LOG_TARGET,
                        "example row has {} cells but the header has {}",
                        cells.len(),
                        examples.headers.len()
                    );
                }
                examples.rows.push(cells);
            }
            return;
        }
        match self.active_steps_mut().and_then(|steps| steps.last_mut()) {
            Some(step) => step.table.get_or_insert_with(Vec::new).push(cells),
            None => log::debug!(
                target: LOG_TARGET,
                "dropping table row with no preceding step"
            ),
        }
    }

    fn consume_tag_line(&mut self, trimmed: &str) {
        for token in trimmed.split_whitespace() {
            if token.starts_with('@') {
                self.pending_tags.push(token.to_string());
            }
        }
    }

    fn push_step(&mut self, step: Step) {
        match self.active_steps_mut() {
            Some(steps) => steps.push(step),
            None => log::debug!(
                target: LOG_TARGET,
                "dropping step {:?} outside any scenario or background",
                step.text
            ),
        }
    }

    fn consume_free_text(&mut self, trimmed: &str) {
        if !self.body_started && !self.name.is_empty() {
            self.description.push(trimmed.to_string());
        }
    }

    /// The step list a table, doc-string, or step line attaches to, chosen
    /// by the current context. `None` when no context is active.
    fn active_steps_mut(&mut self) -> Option<&mut Vec<Step>> {
        if self.in_background {
            return Some(&mut self.background);
        }
        if self.in_outline {
            return self.outline.as_mut().map(|scenario| &mut scenario.steps);
        }
        self.current.as_mut().map(|scenario| &mut scenario.steps)
    }

    fn commit_current(&mut self) {
        if let Some(scenario) = self.current.take() {
            self.scenarios.push(scenario);
        }
    }

    /// Close an open example table, expanding its outline template. A table
    /// with no template stays open; orphan rows keep accumulating into it
    /// until end of document.
    fn close_examples(&mut self) {
        if self.outline.is_none() || self.examples.is_none() {
            return;
        }
        let (Some(template), Some(examples)) = (self.outline.take(), self.examples.take()) else {
            return;
        };
        self.in_outline = false;
        expand_outline(&template, &examples, &mut self.scenarios);
    }

    fn finish(mut self) -> Feature {
        if self.docstring.take().is_some() {
            log::debug!(target: LOG_TARGET, "dropping unterminated doc-string");
        }
        self.commit_current();
        self.close_examples();
        if let Some(template) = self.outline.take() {
            log::debug!(
                target: LOG_TARGET,
                "discarding outline template {:?}: no examples table opened",
                template.name
            );
        }
        if self.examples.take().is_some() {
            log::debug!(target: LOG_TARGET, "dropping examples table with no outline");
        }
        Feature {
            name: self.name,
            description: self.description.join("\n"),
            background: self.background,
            scenarios: self.scenarios,
        }
    }
}

fn parse_step_line(trimmed: &str) -> Option<Step> {
    let caps = STEP_LINE.captures(trimmed)?;
    let keyword = caps.get(1)?.as_str();
    let text = caps.get(2)?.as_str();
    let kind: StepKeyword = keyword.parse().ok()?;
    Some(Step {
        keyword: keyword.to_string(),
        kind,
        text: text.to_string(),
        table: None,
        docstring: None,
    })
}

/// Split a `|`-delimited row into trimmed cells, discarding the empty
/// fragments outside the first and last delimiter.
fn parse_table_cells(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split('|').collect();
    let end = parts.len().saturating_sub(1);
    parts
        .into_iter()
        .take(end)
        .skip(1)
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Produce one concrete scenario per example row by substituting every
/// literal `<header>` occurrence in the template's step text.
///
/// Substitution is literal string replacement, so headers or values holding
/// regex-significant characters cannot corrupt the result.
fn expand_outline(template: &Scenario, examples: &ExampleTable, scenarios: &mut Vec<Scenario>) {
    for (index, row) in examples.rows.iter().enumerate() {
        let steps = template
            .steps
            .iter()
            .map(|step| {
                let mut text = step.text.clone();
                for (header, value) in examples.headers.iter().zip(row) {
                    text = text.replace(&format!("<{header}>"), value);
                }
                Step {
                    text,
                    ..step.clone()
                }
            })
            .collect();
        scenarios.push(Scenario {
            name: format!("{} (Example {})", template.name, index + 1),
            steps,
            tags: template.tags.clone(),
        });
    }
}

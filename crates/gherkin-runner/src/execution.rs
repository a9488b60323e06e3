//! Scenario and step-sequence execution.
//!
//! Execution is single-threaded cooperative: handlers may suspend, but each
//! is awaited to completion before the next starts, in document order, with
//! background steps ahead of the scenario's own. Failures abort the
//! remaining steps of the current call; nothing is retried or rolled back.

use gherkin_runner_patterns::StepKeyword;
use thiserror::Error;

use crate::feature::Step;
use crate::parser;
use crate::registry::{StepArgs, StepError, StepRegistry};

const LOG_TARGET: &str = "gherkin_runner::execution";

/// Progress of a single scenario run.
///
/// `Passed` and `Failed` are terminal; a run moves to `Failed` from either
/// running state the instant a lookup misses or a handler fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    /// The run has not started yet.
    Pending,
    /// Background steps are executing.
    RunningBackground,
    /// The scenario's own steps are executing.
    RunningSteps,
    /// Every step completed.
    Passed,
    /// A lookup missed or a handler failed.
    Failed,
}

/// Failure of a scenario or step-sequence run.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The requested scenario does not exist in the feature document.
    #[error("scenario {name:?} not found in feature document")]
    ScenarioNotFound {
        /// The requested scenario name.
        name: String,
    },
    /// No registered pattern matched the step text.
    ///
    /// Carries a ready-to-paste stub so the missing definition can be added
    /// immediately.
    #[error(
        "missing step definition for \"{keyword} {text}\" in scenario \
         \"{scenario}\"\n\nAdd this step definition:\n\n{stub}"
    )]
    MissingStep {
        /// The step's raw keyword token.
        keyword: String,
        /// The step's literal text.
        text: String,
        /// Label of the enclosing scenario run.
        scenario: String,
        /// Suggested registration code.
        stub: String,
    },
    /// A handler ran and reported failure.
    #[error("step failed: \"{keyword} {text}\" in scenario \"{scenario}\": {source}")]
    StepFailed {
        /// The step's raw keyword token.
        keyword: String,
        /// The step's literal text.
        text: String,
        /// Label of the enclosing scenario run.
        scenario: String,
        /// The handler's own failure.
        #[source]
        source: StepError,
    },
}

/// Run a step sequence strictly in order, awaiting each handler to
/// completion before starting the next.
///
/// Arguments are assembled per step as captured groups in capture order,
/// then the data table, then the doc-string.
///
/// # Errors
///
/// Returns [`ExecutionError::MissingStep`] when no registration matches a
/// step's text, or [`ExecutionError::StepFailed`] wrapping a handler's
/// failure; either aborts the remaining steps.
pub async fn execute_steps(
    registry: &StepRegistry,
    steps: &[Step],
    scenario_label: &str,
) -> Result<(), ExecutionError> {
    for step in steps {
        let Some(found) = registry.find_step(&step.text) else {
            return Err(ExecutionError::MissingStep {
                keyword: step.keyword.clone(),
                text: step.text.clone(),
                scenario: scenario_label.to_string(),
                stub: stub_suggestion(step),
            });
        };
        log::debug!(
            target: LOG_TARGET,
            "executing \"{} {}\" in {scenario_label:?}",
            step.keyword,
            step.text
        );
        let args = StepArgs {
            captures: found.captures,
            table: step.table.clone(),
            docstring: step.docstring.clone(),
        };
        (found.handler)(args)
            .await
            .map_err(|source| ExecutionError::StepFailed {
                keyword: step.keyword.clone(),
                text: step.text.clone(),
                scenario: scenario_label.to_string(),
                source,
            })?;
    }
    Ok(())
}

/// Parse a feature document, locate a scenario by exact name, and run its
/// background-then-scenario step sequence.
///
/// # Errors
///
/// Returns [`ExecutionError::ScenarioNotFound`] when no scenario carries the
/// requested name, otherwise propagates [`execute_steps`] failures.
pub async fn execute_scenario(
    registry: &StepRegistry,
    feature_text: &str,
    scenario_name: &str,
) -> Result<(), ExecutionError> {
    let feature = parser::parse(feature_text);
    let Some(scenario) = feature.scenario(scenario_name) else {
        return Err(ExecutionError::ScenarioNotFound {
            name: scenario_name.to_string(),
        });
    };

    let mut state = ScenarioState::Pending;
    if !feature.background.is_empty() {
        advance(&mut state, ScenarioState::RunningBackground, scenario_name);
        if let Err(err) = execute_steps(registry, &feature.background, "Background").await {
            advance(&mut state, ScenarioState::Failed, scenario_name);
            return Err(err);
        }
    }
    advance(&mut state, ScenarioState::RunningSteps, scenario_name);
    match execute_steps(registry, &scenario.steps, &scenario.name).await {
        Ok(()) => {
            advance(&mut state, ScenarioState::Passed, scenario_name);
            Ok(())
        }
        Err(err) => {
            advance(&mut state, ScenarioState::Failed, scenario_name);
            Err(err)
        }
    }
}

fn advance(state: &mut ScenarioState, to: ScenarioState, scenario: &str) {
    log::debug!(target: LOG_TARGET, "scenario {scenario:?}: {state:?} -> {to:?}");
    *state = to;
}

/// Ready-to-paste registration code for an unmatched step.
fn stub_suggestion(step: &Step) -> String {
    let helper = match step.kind {
        StepKeyword::When => "when",
        StepKeyword::Then => "then",
        StepKeyword::And => "and",
        StepKeyword::But => "but",
        StepKeyword::Given | StepKeyword::Any => "given",
    };
    format!("{helper}({:?}, |_args| Ok(()));", step.text)
}

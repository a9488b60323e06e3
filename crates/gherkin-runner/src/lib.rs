//! Behaviour-driven test execution with a process-wide step registry.
//!
//! The crate turns plain-text feature documents into executable runs in three
//! stages: the [`parser`] converts document text into a [`Feature`] with all
//! scenario outlines expanded; the [`registry`] resolves free-text step lines
//! against pattern-based handlers (raw regular expressions or the
//! `{string}`/`{int}`/`{float}`/`{word}` expression vocabulary); and the
//! [`execution`] engine runs background-then-scenario step sequences
//! strictly in order, attaching captured groups, data tables, and
//! doc-strings to each handler invocation.
//!
//! Step definitions registered through [`given`], [`when`], [`then`],
//! [`and`], and [`but`] land in one process-lifetime registry so they are
//! written once and reused by every feature run in the process. Isolated
//! runs construct their own [`StepRegistry`] instead, or call
//! [`StepRegistry::clear`] between runs.
//!
//! # Examples
//!
//! ```
//! use gherkin_runner::{StepKeyword, StepRegistry, execution};
//!
//! const FEATURE: &str = "\
//! Feature: Calculator
//! Scenario: Addition
//!     Given a calculator
//!     When I add 2 and 3
//!     Then the total is 5";
//!
//! let registry = StepRegistry::new();
//! registry.register_fn(StepKeyword::Given, "a calculator", |_args| Ok(()))?;
//! registry.register_fn(StepKeyword::When, "I add {int} and {int}", |args| {
//!     assert_eq!(args.captures, vec!["2", "3"]);
//!     Ok(())
//! })?;
//! registry.register_fn(StepKeyword::Then, "the total is {int}", |_args| Ok(()))?;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build()?;
//! runtime.block_on(execution::execute_scenario(&registry, FEATURE, "Addition"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod execution;
pub mod feature;
pub mod hooks;
pub mod parser;
pub mod registry;

pub use execution::{ExecutionError, ScenarioState, execute_scenario, execute_steps};
pub use feature::{DataTable, Feature, Scenario, Step};
pub use gherkin_runner_patterns::{PatternError, StepKeyword, StepKeywordParseError};
pub use hooks::{HookKind, HookRegistry};
pub use parser::{ParseFileError, parse, parse_file};
pub use registry::{
    StepArgs, StepDefinition, StepError, StepFuture, StepHandler, StepMatch, StepPattern,
    StepRegistry, StepResult, and, but, given, then, when,
};

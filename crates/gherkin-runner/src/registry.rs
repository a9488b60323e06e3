//! Step registration and lookup.
//!
//! A [`StepRegistry`] holds an ordered list of step definitions. Definitions
//! are appended, never replaced or deduplicated, and lookup returns the first
//! definition whose pattern matches the step text — so overlapping patterns
//! resolve by registration order. One process-lifetime instance is exposed
//! through [`global`], enabling step definitions authored once to be reused
//! across every feature run in the process; callers needing isolation build
//! their own instance or [`clear`](StepRegistry::clear) between runs.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use gherkin_runner_patterns::{
    PatternError, StepKeyword, compile_expression, extract_captured_values,
};
use regex::Regex;
use thiserror::Error;

use crate::feature::DataTable;

const LOG_TARGET: &str = "gherkin_runner::registry";

/// Failure reported by a step handler.
///
/// Handlers produce a plain message; the execution engine wraps it with the
/// offending step and scenario before propagating.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StepError(pub String);

impl StepError {
    /// Build a step failure from any message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Completion signal returned by step handlers.
pub type StepResult = Result<(), StepError>;

/// The awaitable completion of a step handler invocation.
pub type StepFuture = Pin<Box<dyn Future<Output = StepResult> + Send>>;

/// A registered handler: uniform signature taking the full argument bundle
/// and returning an awaitable completion.
pub type StepHandler = Arc<dyn Fn(StepArgs) -> StepFuture + Send + Sync>;

/// Arguments handed to a step handler: captured pattern groups in capture
/// order, then the step's data table and doc-string when present.
#[derive(Debug, Clone, Default)]
pub struct StepArgs {
    /// Captured pattern groups, full match excluded.
    pub captures: Vec<String>,
    /// Data table attached to the step, if any.
    pub table: Option<DataTable>,
    /// Doc-string attached to the step, if any.
    pub docstring: Option<String>,
}

impl StepArgs {
    /// Captured group by zero-based index.
    #[must_use]
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(String::as_str)
    }
}

/// A step pattern as supplied at registration.
///
/// The expression form is compiled through the placeholder vocabulary and
/// anchored start-to-end; a ready-made [`Regex`] is used verbatim, so callers
/// supplying one are responsible for anchoring it.
#[derive(Debug, Clone)]
pub enum StepPattern {
    /// Expression with `{string}`/`{int}`/`{float}`/`{word}` placeholders.
    Expression(String),
    /// A pre-built regular expression, used as-is.
    Regex(Regex),
}

impl StepPattern {
    fn compile(self) -> Result<(Regex, String), PatternError> {
        match self {
            Self::Expression(expr) => {
                let regex = compile_expression(&expr)?;
                Ok((regex, expr))
            }
            Self::Regex(regex) => {
                let source = regex.as_str().to_string();
                Ok((regex, source))
            }
        }
    }
}

impl From<&str> for StepPattern {
    fn from(expr: &str) -> Self {
        Self::Expression(expr.to_string())
    }
}

impl From<String> for StepPattern {
    fn from(expr: String) -> Self {
        Self::Expression(expr)
    }
}

impl From<Regex> for StepPattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

struct RegisteredStep {
    keyword: StepKeyword,
    pattern: String,
    regex: Regex,
    handler: StepHandler,
}

/// Snapshot of one registration, exposed for introspection and testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    /// Keyword class the definition was registered under.
    pub keyword: StepKeyword,
    /// Source text of the pattern.
    pub pattern: String,
}

/// A successful lookup: the handler to invoke plus the values its pattern
/// captured from the step text.
pub struct StepMatch {
    /// The registered handler.
    pub handler: StepHandler,
    /// Captured groups in capture order, full match excluded.
    pub captures: Vec<String>,
}

/// An ordered, append-only collection of step definitions.
#[derive(Default)]
pub struct StepRegistry {
    steps: Mutex<Vec<RegisteredStep>>,
}

impl StepRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition. Existing definitions are never replaced;
    /// overlapping patterns resolve first-registered-wins at match time.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when an expression pattern fails to compile.
    pub fn register(
        &self,
        keyword: StepKeyword,
        pattern: impl Into<StepPattern>,
        handler: StepHandler,
    ) -> Result<(), PatternError> {
        let (regex, pattern) = pattern.into().compile()?;
        log::debug!(target: LOG_TARGET, "registering {keyword} step `{pattern}`");
        self.lock().push(RegisteredStep {
            keyword,
            pattern,
            regex,
            handler,
        });
        Ok(())
    }

    /// Register a synchronous handler, adapted to the uniform awaitable
    /// signature through an immediately-ready future.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when an expression pattern fails to compile.
    pub fn register_fn<F>(
        &self,
        keyword: StepKeyword,
        pattern: impl Into<StepPattern>,
        handler: F,
    ) -> Result<(), PatternError>
    where
        F: Fn(StepArgs) -> StepResult + Send + Sync + 'static,
    {
        self.register(
            keyword,
            pattern,
            Arc::new(move |args: StepArgs| -> StepFuture {
                Box::pin(std::future::ready(handler(args)))
            }),
        )
    }

    /// Register an asynchronous handler.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when an expression pattern fails to compile.
    pub fn register_async<F, Fut>(
        &self,
        keyword: StepKeyword,
        pattern: impl Into<StepPattern>,
        handler: F,
    ) -> Result<(), PatternError>
    where
        F: Fn(StepArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.register(
            keyword,
            pattern,
            Arc::new(move |args: StepArgs| -> StepFuture { Box::pin(handler(args)) }),
        )
    }

    /// Resolve step text against the registrations, in registration order.
    ///
    /// Matching considers the text only; the registered keyword class is
    /// metadata. Returns `None` when no pattern matches.
    #[must_use]
    pub fn find_step(&self, text: &str) -> Option<StepMatch> {
        let steps = self.lock();
        log::debug!(
            target: LOG_TARGET,
            "resolving step text {text:?} against {} definitions",
            steps.len()
        );
        steps.iter().find_map(|step| {
            extract_captured_values(&step.regex, text).map(|captures| {
                log::debug!(target: LOG_TARGET, "matched pattern `{}`", step.pattern);
                StepMatch {
                    handler: Arc::clone(&step.handler),
                    captures,
                }
            })
        })
    }

    /// Remove every registration.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the registry holds no registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of all registrations, in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<StepDefinition> {
        self.lock()
            .iter()
            .map(|step| StepDefinition {
                keyword: step.keyword,
                pattern: step.pattern.clone(),
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RegisteredStep>> {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL: LazyLock<StepRegistry> = LazyLock::new(StepRegistry::new);

/// The process-wide default registry.
///
/// Shared across every feature run in the process so definitions are written
/// once. Independent test runs must call [`StepRegistry::clear`] or use their
/// own instance; the `Mutex` inside only guarantees memory safety, not run
/// isolation.
#[must_use]
pub fn global() -> &'static StepRegistry {
    &GLOBAL
}

fn register_global<F>(keyword: StepKeyword, pattern: impl Into<StepPattern>, handler: F)
where
    F: Fn(StepArgs) -> StepResult + Send + Sync + 'static,
{
    global()
        .register_fn(keyword, pattern, handler)
        .unwrap_or_else(|err| panic!("invalid step pattern: {err}"));
}

/// Register a `Given` step on the global registry.
///
/// # Panics
///
/// Panics when the pattern fails to compile.
///
/// # Examples
///
/// ```
/// use gherkin_runner::registry::given;
///
/// given("a calculator", |_args| Ok(()));
/// ```
pub fn given<F>(pattern: impl Into<StepPattern>, handler: F)
where
    F: Fn(StepArgs) -> StepResult + Send + Sync + 'static,
{
    register_global(StepKeyword::Given, pattern, handler);
}

/// Register a `When` step on the global registry.
///
/// # Panics
///
/// Panics when the pattern fails to compile.
pub fn when<F>(pattern: impl Into<StepPattern>, handler: F)
where
    F: Fn(StepArgs) -> StepResult + Send + Sync + 'static,
{
    register_global(StepKeyword::When, pattern, handler);
}

/// Register a `Then` step on the global registry.
///
/// # Panics
///
/// Panics when the pattern fails to compile.
pub fn then<F>(pattern: impl Into<StepPattern>, handler: F)
where
    F: Fn(StepArgs) -> StepResult + Send + Sync + 'static,
{
    register_global(StepKeyword::Then, pattern, handler);
}

/// Register an `And` step on the global registry.
///
/// # Panics
///
/// Panics when the pattern fails to compile.
pub fn and<F>(pattern: impl Into<StepPattern>, handler: F)
where
    F: Fn(StepArgs) -> StepResult + Send + Sync + 'static,
{
    register_global(StepKeyword::And, pattern, handler);
}

/// Register a `But` step on the global registry.
///
/// # Panics
///
/// Panics when the pattern fails to compile.
pub fn but<F>(pattern: impl Into<StepPattern>, handler: F)
where
    F: Fn(StepArgs) -> StepResult + Send + Sync + 'static,
{
    register_global(StepKeyword::But, pattern, handler);
}

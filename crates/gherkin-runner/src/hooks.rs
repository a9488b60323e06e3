//! Lifecycle hook registration and dispatch.
//!
//! The engine itself never schedules hooks; the host's orchestration layer
//! invokes [`HookRegistry::run_hooks`] around its feature and scenario
//! boundaries. Hooks of one kind run sequentially in registration order and
//! are awaited to completion, mirroring step execution.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use crate::registry::StepError;

const LOG_TARGET: &str = "gherkin_runner::hooks";

/// The awaitable completion of a hook invocation.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<(), StepError>> + Send>>;

type Hook = Arc<dyn Fn() -> HookFuture + Send + Sync>;

/// The four lifecycle notification points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Before the first scenario of a feature.
    BeforeFeature,
    /// After the last scenario of a feature.
    AfterFeature,
    /// Before each scenario.
    BeforeScenario,
    /// After each scenario.
    AfterScenario,
}

#[derive(Default)]
struct HookLists {
    before_feature: Vec<Hook>,
    after_feature: Vec<Hook>,
    before_scenario: Vec<Hook>,
    after_scenario: Vec<Hook>,
}

impl HookLists {
    fn list(&self, kind: HookKind) -> &Vec<Hook> {
        match kind {
            HookKind::BeforeFeature => &self.before_feature,
            HookKind::AfterFeature => &self.after_feature,
            HookKind::BeforeScenario => &self.before_scenario,
            HookKind::AfterScenario => &self.after_scenario,
        }
    }

    fn list_mut(&mut self, kind: HookKind) -> &mut Vec<Hook> {
        match kind {
            HookKind::BeforeFeature => &mut self.before_feature,
            HookKind::AfterFeature => &mut self.after_feature,
            HookKind::BeforeScenario => &mut self.before_scenario,
            HookKind::AfterScenario => &mut self.after_scenario,
        }
    }
}

/// Ordered lists of lifecycle hooks, one per [`HookKind`].
#[derive(Default)]
pub struct HookRegistry {
    hooks: Mutex<HookLists>,
}

impl HookRegistry {
    /// Create an empty hook registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous hook.
    pub fn register_fn<F>(&self, kind: HookKind, hook: F)
    where
        F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.lock()
            .list_mut(kind)
            .push(Arc::new(move || -> HookFuture {
                Box::pin(std::future::ready(hook()))
            }));
    }

    /// Register an asynchronous hook.
    pub fn register_async<F, Fut>(&self, kind: HookKind, hook: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StepError>> + Send + 'static,
    {
        self.lock()
            .list_mut(kind)
            .push(Arc::new(move || -> HookFuture { Box::pin(hook()) }));
    }

    /// Run every hook of one kind, sequentially, in registration order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first hook failure.
    pub async fn run_hooks(&self, kind: HookKind) -> Result<(), StepError> {
        let hooks: Vec<Hook> = self.lock().list(kind).clone();
        log::debug!(target: LOG_TARGET, "running {} {kind:?} hooks", hooks.len());
        for hook in hooks {
            hook().await?;
        }
        Ok(())
    }

    /// Number of hooks registered for one kind.
    #[must_use]
    pub fn len(&self, kind: HookKind) -> usize {
        self.lock().list(kind).len()
    }

    /// Whether no hooks of the given kind are registered.
    #[must_use]
    pub fn is_empty(&self, kind: HookKind) -> bool {
        self.len(kind) == 0
    }

    /// Remove every hook of every kind.
    pub fn clear(&self) {
        *self.lock() = HookLists::default();
    }

    fn lock(&self) -> MutexGuard<'_, HookLists> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL: LazyLock<HookRegistry> = LazyLock::new(HookRegistry::new);

/// The process-wide default hook registry.
#[must_use]
pub fn global() -> &'static HookRegistry {
    &GLOBAL
}

/// Register a synchronous before-feature hook on the global registry.
pub fn before_feature<F>(hook: F)
where
    F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
{
    global().register_fn(HookKind::BeforeFeature, hook);
}

/// Register a synchronous after-feature hook on the global registry.
pub fn after_feature<F>(hook: F)
where
    F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
{
    global().register_fn(HookKind::AfterFeature, hook);
}

/// Register a synchronous before-scenario hook on the global registry.
pub fn before_scenario<F>(hook: F)
where
    F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
{
    global().register_fn(HookKind::BeforeScenario, hook);
}

/// Register a synchronous after-scenario hook on the global registry.
pub fn after_scenario<F>(hook: F)
where
    F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
{
    global().register_fn(HookKind::AfterScenario, hook);
}

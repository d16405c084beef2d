//! Hook registration and lifecycle-point lookup.
//!
//! An explicit [`HookRegistry`] instance is handed to the engine at
//! construction — there is no ambient global lookup, so the engine can be
//! exercised with a purpose-built registry in tests. How tag filters are
//! evaluated is entirely this module's concern; the engine only passes the
//! active scope's tag set through.

use std::fmt;

use crate::model::TagSet;

/// Lifecycle points a hook can bind to. Invocation order within a run is
/// fixed by the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Once, before any feature runs.
    BeforeAll,
    /// Before each feature, filtered by the feature's tags.
    BeforeFeature,
    /// Before each scenario, filtered by the scenario's tags.
    Before,
    /// Before each attempted step, filtered by the scenario's tags.
    BeforeStep,
    /// After each attempted step; guaranteed once the attempt begins.
    AfterStep,
    /// After each scenario; guaranteed once the scenario is entered.
    After,
    /// After each feature; guaranteed once the feature is entered.
    AfterFeature,
    /// Once, after all features; guaranteed unconditionally.
    AfterAll,
}

impl HookKind {
    /// Lifecycle point name as written in hook declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            HookKind::BeforeAll => "beforeAll",
            HookKind::BeforeFeature => "beforeFeature",
            HookKind::Before => "before",
            HookKind::BeforeStep => "beforeStep",
            HookKind::AfterStep => "afterStep",
            HookKind::After => "after",
            HookKind::AfterFeature => "afterFeature",
            HookKind::AfterAll => "afterAll",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which tag sets a hook applies to.
#[derive(Debug, Clone)]
pub enum TagFilter {
    /// Applies to every scope.
    Always,
    /// Applies when the scope carries at least one of the listed tags.
    AnyOf(Vec<String>),
}

impl TagFilter {
    /// Whether a scope with the given tags matches this filter.
    pub fn accepts(&self, tags: &TagSet) -> bool {
        match self {
            TagFilter::Always => true,
            TagFilter::AnyOf(wanted) => wanted.iter().any(|t| tags.contains(t)),
        }
    }
}

/// A hook body. Returns `Err` to signal failure; state is carried through
/// the closure's captures.
pub type HookFn = Box<dyn Fn() -> anyhow::Result<()>>;

/// A hook bound to a lifecycle point with its tag filter.
pub struct RegisteredHook {
    kind: HookKind,
    filter: TagFilter,
    body: HookFn,
}

impl RegisteredHook {
    /// The lifecycle point this hook is bound to.
    pub fn kind(&self) -> HookKind {
        self.kind
    }

    /// Run the hook body.
    pub fn invoke(&self) -> anyhow::Result<()> {
        (self.body)()
    }
}

impl fmt::Debug for RegisteredHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredHook")
            .field("kind", &self.kind)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// Registry of lifecycle hooks, queried per lifecycle point and tag set.
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: Vec<RegisteredHook>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook at a lifecycle point.
    pub fn register(
        &mut self,
        kind: HookKind,
        filter: TagFilter,
        body: impl Fn() -> anyhow::Result<()> + 'static,
    ) {
        self.hooks.push(RegisteredHook {
            kind,
            filter,
            body: Box::new(body),
        });
    }

    /// Hooks registered at `kind` whose filter accepts `tags`, in
    /// registration order.
    pub fn query<'a>(
        &'a self,
        kind: HookKind,
        tags: &'a TagSet,
    ) -> impl Iterator<Item = &'a RegisteredHook> {
        self.hooks
            .iter()
            .filter(move |hook| hook.kind == kind && hook.filter.accepts(tags))
    }

    /// Total number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

//! Per-scope execution records and the context stack.
//!
//! The traversal pushes one [`ExecutionRecord`] per entered scope and pops
//! it on exit. Records default to `passed` and carry the scope's elapsed
//! time; step scopes additionally carry a [`StepRecord`] for captured output
//! and collected check failures. The stack is owned and mutated exclusively
//! by the traversal call stack — there is no other thread of control.

use std::time::{Duration, Instant};

use crate::model::{DataTable, SourceLocation};
use crate::outcome::Outcome;

/// A single recorded check failure (soft assertion) within a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    /// Failure message.
    pub message: String,
    /// Where the check was made, if known.
    pub location: Option<SourceLocation>,
}

/// Step-scoped capture state: emitted output and collected check failures.
///
/// Created on step-scope entry, drained by the engine on every exit path,
/// destroyed on scope exit. Never shared across scopes.
#[derive(Debug, Default)]
pub struct StepRecord {
    output: String,
    failures: Vec<CheckFailure>,
}

impl StepRecord {
    /// Append a line of step output to the capture buffer.
    pub fn puts(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Record a check failure without aborting the step body.
    pub fn record_failure(&mut self, message: String, location: Option<SourceLocation>) {
        self.failures.push(CheckFailure { message, location });
    }

    /// Whether any check failures were collected.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Drain the collected check failures.
    pub fn take_failures(&mut self) -> Vec<CheckFailure> {
        std::mem::take(&mut self.failures)
    }

    /// Drain the captured output buffer.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

/// Mutable execution state for one entered scope.
#[derive(Debug)]
pub struct ExecutionRecord {
    outcome: Outcome,
    started: Instant,
    step: Option<StepRecord>,
}

impl ExecutionRecord {
    fn new(step: bool) -> Self {
        Self {
            outcome: Outcome::Passed,
            started: Instant::now(),
            step: step.then(StepRecord::default),
        }
    }

    /// Current outcome; `passed` until changed.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Set the outcome unconditionally.
    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }

    /// Mark the scope failed unless it already diverged from `passed`.
    pub fn mark_failed(&mut self) {
        if self.outcome == Outcome::Passed {
            self.outcome = Outcome::Failed;
        }
    }

    /// Time elapsed since the scope was entered.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// The step capture record, present only for step scopes.
    pub fn step(&mut self) -> Option<&mut StepRecord> {
        self.step.as_mut()
    }
}

/// Stack of per-scope execution records mirroring the
/// Feature → Rule → Scenario → Step call stack.
#[derive(Debug)]
pub struct ContextManager {
    stack: Vec<ExecutionRecord>,
}

impl ContextManager {
    /// Create a stack holding the root (whole-run) record.
    pub fn new() -> Self {
        Self {
            stack: vec![ExecutionRecord::new(false)],
        }
    }

    /// Enter a Feature, Rule, or Scenario scope.
    pub fn enter(&mut self) {
        self.stack.push(ExecutionRecord::new(false));
    }

    /// Enter a Step scope, which carries a capture record.
    pub fn enter_step(&mut self) {
        self.stack.push(ExecutionRecord::new(true));
    }

    /// Exit the innermost scope, returning its final record.
    pub fn exit(&mut self) -> ExecutionRecord {
        debug_assert!(self.stack.len() > 1, "root scope is never exited");
        self.stack
            .pop()
            .expect("context stack holds at least the root scope")
    }

    /// The innermost active scope's record.
    pub fn current(&self) -> &ExecutionRecord {
        self.stack
            .last()
            .expect("context stack holds at least the root scope")
    }

    /// Mutable access to the innermost active scope's record.
    pub fn current_mut(&mut self) -> &mut ExecutionRecord {
        self.stack
            .last_mut()
            .expect("context stack holds at least the root scope")
    }

    /// Outcome of the scope enclosing the innermost one.
    pub fn parent_outcome(&self) -> Outcome {
        let parent = self
            .stack
            .len()
            .checked_sub(2)
            .expect("parent scope requires nesting");
        self.stack[parent].outcome()
    }

    /// The innermost active step's capture record.
    pub fn innermost_step(&mut self) -> &mut StepRecord {
        self.stack
            .iter_mut()
            .rev()
            .find_map(|record| record.step.as_mut())
            .expect("no step scope is active")
    }

    /// Current nesting depth, including the root scope.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Default for ContextManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle passed to a step body: captured arguments, the step's data table,
/// and the step's capture channels.
pub struct StepContext<'a> {
    /// Arguments captured from the step text.
    pub captures: &'a [String],
    /// Data table attached to the step, if any.
    pub table: Option<&'a DataTable>,
    record: &'a mut StepRecord,
}

impl<'a> StepContext<'a> {
    /// Create a context for one step attempt.
    pub fn new(
        captures: &'a [String],
        table: Option<&'a DataTable>,
        record: &'a mut StepRecord,
    ) -> Self {
        Self {
            captures,
            table,
            record,
        }
    }

    /// Captured argument by position, if present.
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(String::as_str)
    }

    /// Emit a line of step output; forwarded to the report as a `Trace`
    /// event when the step scope exits.
    pub fn puts(&mut self, text: impl AsRef<str>) {
        self.record.puts(text.as_ref());
    }

    /// Record a soft check failure if `condition` is false. Does not abort
    /// the step body; a step with collected failures ends `failed` even if
    /// the body returns `Ok`.
    pub fn check(&mut self, condition: bool, message: impl Into<String>) {
        if !condition {
            self.record.record_failure(message.into(), None);
        }
    }

    /// Like [`StepContext::check`], with a source location for the report.
    pub fn check_at(
        &mut self,
        condition: bool,
        message: impl Into<String>,
        location: SourceLocation,
    ) {
        if !condition {
            self.record.record_failure(message.into(), Some(location));
        }
    }
}
